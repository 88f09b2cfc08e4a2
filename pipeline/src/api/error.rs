use promptsmith_provider::{ProviderError, ProviderKind};
use thiserror::Error;

use crate::spi::LedgerError;

/// Failures while resolving what to run a request against.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("no default model configured for tier '{0}'")]
    NoDefaultForTier(String),

    #[error("no adapter registered for provider '{0}'")]
    ProviderNotRegistered(ProviderKind),
}

/// Everything a pipeline caller can see go wrong.
///
/// Configuration and credit errors are terminal and occur before any
/// outbound call. A `Provider` error is only surfaced after the ledger
/// reservation was rolled back. `LedgerInconsistent` is the one state
/// operators must reconcile out of band: output was produced but the
/// commit could not be acknowledged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("insufficient credits: required {required}, available {balance}")]
    InsufficientCredits { required: u64, balance: u64 },

    #[error("model '{0}' does not support suggestions")]
    UnsupportedBySelectedModel(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("ledger inconsistent for reservation {reservation_id}: {detail}")]
    LedgerInconsistent {
        reservation_id: String,
        detail: String,
    },

    #[error("ledger error: {0}")]
    Ledger(LedgerError),
}

impl PipelineError {
    /// Stable user-facing message category for this error.
    ///
    /// Raw upstream error bodies never appear here; they are logged only.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => {
                "The requested model is not available. Please choose a different model."
            }
            PipelineError::InsufficientCredits { .. } => {
                "You do not have enough credits for this request. Please top up your balance."
            }
            PipelineError::UnsupportedBySelectedModel(_) => {
                "The selected model cannot produce suggestions. Please choose a different model."
            }
            PipelineError::Provider(ProviderError::InvalidCredentials(_)) => {
                "The service is misconfigured. Please contact support."
            }
            PipelineError::Provider(ProviderError::RateLimited { .. })
            | PipelineError::Provider(ProviderError::QuotaExhausted(_)) => {
                "The service is busy right now. Please try again shortly."
            }
            PipelineError::Provider(ProviderError::UnsupportedModel(_)) => {
                "The selected model is not available. Please choose a different model."
            }
            PipelineError::Provider(ProviderError::UpstreamUnavailable(_)) => {
                "The generation service is temporarily unavailable. Please try again shortly."
            }
            PipelineError::Provider(ProviderError::Unknown(_)) => {
                "Something went wrong while generating. Please try again."
            }
            PipelineError::LedgerInconsistent { .. } => {
                "Your request completed but billing could not be confirmed. Support has been notified."
            }
            PipelineError::Ledger(_) => "A billing error occurred. Please try again.",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
