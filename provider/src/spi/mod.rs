//! Provider SPI - the contract every upstream adapter satisfies
//!
//! One adapter exists per [`ProviderKind`]. Each translates the canonical
//! [`PromptRequest`] into its provider's wire format, performs exactly one
//! outbound HTTP call, and maps the response or failure into
//! [`RawCompletion`] / [`ProviderError`]. Retry policy does not live here;
//! a failed invocation is final from the adapter's point of view.

mod anthropic;
mod cohere;
mod gemini;
mod mistral;
mod openai;

pub use anthropic::AnthropicAdapter;
pub use cohere::CohereAdapter;
pub use gemini::GeminiAdapter;
pub use mistral::MistralAdapter;
pub use openai::OpenAiAdapter;

use crate::api::{PromptRequest, ProviderError, ProviderKind, ProviderResult, RawCompletion};

/// Uniform invocation contract over the closed set of upstream providers.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one adapter instance serves many
/// concurrent requests.
#[async_trait::async_trait]
pub trait ProviderAdapter: Send + Sync + std::fmt::Debug {
    /// Stable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// The provider kind this adapter serves.
    fn kind(&self) -> ProviderKind;

    /// Whether the adapter has the configuration it needs (API key present).
    ///
    /// Must not perform network calls.
    fn is_configured(&self) -> bool;

    /// Send the canonical request to the upstream model and return its raw
    /// output.
    ///
    /// # Errors
    ///
    /// Every failure is classified into [`ProviderError`]; transport-level
    /// timeouts and connection failures map to
    /// [`ProviderError::UpstreamUnavailable`].
    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion>;
}

/// Map a transport-level `reqwest` failure into the taxonomy.
///
/// Shared by all adapters so a timeout means the same thing everywhere.
pub(crate) fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() || err.is_connect() {
        ProviderError::UpstreamUnavailable(err.to_string())
    } else {
        ProviderError::Unknown(err.to_string())
    }
}

/// Parse a `Retry-After` header (seconds form) into milliseconds.
pub(crate) fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(|seconds| seconds.saturating_mul(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn retry_after_header_is_parsed_as_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(retry_after_ms(&headers), Some(2000));
    }

    #[test]
    fn missing_or_date_retry_after_is_ignored() {
        let headers = HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"),
        );
        assert_eq!(retry_after_ms(&headers), None);
    }
}
