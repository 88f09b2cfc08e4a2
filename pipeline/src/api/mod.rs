//! Pipeline API - the interface consumed by transport layers
//!
//! Callers (HTTP handlers, RPC services, CLIs) depend on
//! [`GenerationService`] and the types here, never on the orchestrator
//! internals or the provider crate directly.

mod error;
mod types;

use async_trait::async_trait;

pub use error::{ConfigurationError, PipelineError, PipelineResult};
pub use types::{
    GenerationRequest, GenerationResult, ModelDescriptor, SuggestionCategory, SuggestionResult,
    DEFAULT_TIER,
};

/// The pipeline entry points.
///
/// All three operations share the same lifecycle: resolve the model,
/// pre-authorize the credit cost, invoke the provider, normalize, and
/// finalize the ledger exactly once. A caller is never charged for a
/// request that failed, and never receives output without being charged
/// the resolved model's cost.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Turn an idea into a complete prompt.
    async fn generate(&self, request: GenerationRequest) -> PipelineResult<GenerationResult>;

    /// Rework an existing draft prompt.
    async fn improve(&self, request: GenerationRequest) -> PipelineResult<GenerationResult>;

    /// Produce categorized keyword suggestions.
    ///
    /// Fails with [`PipelineError::UnsupportedBySelectedModel`] before any
    /// billing when the resolved model does not support suggestions.
    async fn suggest(&self, request: GenerationRequest) -> PipelineResult<SuggestionResult>;
}
