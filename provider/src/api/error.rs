use thiserror::Error;

/// Provider failures, classified into a stable taxonomy.
///
/// Every adapter maps its provider-native transport and error-body shapes
/// into exactly one of these variants; the pipeline relies on the tag to
/// decide ledger rollback and the user-facing message, never on the raw
/// upstream payload.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("rate limited{}", match .retry_after_ms {
        Some(ms) => format!(" (retry after {}ms)", ms),
        None => String::new(),
    })]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("unsupported model: {0}")]
    UnsupportedModel(String),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("provider error: {0}")]
    Unknown(String),
}

impl ProviderError {
    /// Whether a later, identical request could plausibly succeed.
    ///
    /// The pipeline never retries a provider call itself (a retry is a new
    /// request with a fresh reservation); this is surfaced so callers can
    /// distinguish "try again shortly" from terminal failures.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited { .. } | ProviderError::UpstreamUnavailable(_)
        )
    }

    /// Retry delay hint from a rate-limit response, if the upstream sent one.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            ProviderError::RateLimited { retry_after_ms: Some(ms) } => {
                Some(std::time::Duration::from_millis(*ms))
            }
            _ => None,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ProviderError::RateLimited { retry_after_ms: None }.is_transient());
        assert!(ProviderError::UpstreamUnavailable("503".into()).is_transient());
        assert!(!ProviderError::InvalidCredentials("bad key".into()).is_transient());
        assert!(!ProviderError::QuotaExhausted("plan limit".into()).is_transient());
    }

    #[test]
    fn retry_after_hint() {
        let err = ProviderError::RateLimited { retry_after_ms: Some(1500) };
        assert_eq!(err.retry_after(), Some(std::time::Duration::from_millis(1500)));
        assert!(err.to_string().contains("1500ms"));

        let err = ProviderError::RateLimited { retry_after_ms: None };
        assert_eq!(err.retry_after(), None);
    }
}
