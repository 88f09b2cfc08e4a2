//! Anthropic provider adapter

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{retry_after_ms, transport_error, ProviderAdapter};
use crate::api::{
    instructions, PromptRequest, ProviderError, ProviderKind, ProviderResult, RawCompletion,
};
use crate::config::{keys, ProviderConfig};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic adapter: `x-api-key` header auth plus a pinned API version
/// header; the system instruction travels in a dedicated top-level field.
#[derive(Debug)]
pub struct AnthropicAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AnthropicAdapter {
    /// Create the adapter from environment configuration.
    ///
    /// Reads `ANTHROPIC_API_KEY`, optionally `ANTHROPIC_BASE_URL`.
    pub fn from_env() -> ProviderResult<Self> {
        let api_key = std::env::var(keys::ANTHROPIC_API_KEY).map_err(|_| {
            ProviderError::InvalidCredentials(format!("{} not set", keys::ANTHROPIC_API_KEY))
        })?;

        let base_url = std::env::var(keys::ANTHROPIC_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(ProviderConfig {
            name: ProviderKind::Anthropic.as_str().to_string(),
            api_key: Some(api_key),
            base_url: Some(base_url),
            timeout_ms: ProviderConfig::default().timeout_ms,
        }))
    }

    /// Create the adapter with explicit configuration.
    pub fn new(config: ProviderConfig) -> Self {
        let api_key = config.api_key.clone().unwrap_or_default();
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key,
            base_url,
        }
    }

    fn build_body(request: &PromptRequest, model: &str) -> AnthropicRequest {
        AnthropicRequest {
            model: model.to_string(),
            max_tokens: 1024,
            system: instructions::system_prompt(request),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: instructions::user_prompt(request),
            }],
            temperature: 0.7,
        }
    }

    /// Map HTTP status and error body to the taxonomy.
    ///
    /// Anthropic reports an empty prepaid balance as a 400 mentioning the
    /// credit balance, and plan-level exhaustion on 429 bodies that mention
    /// the quota.
    fn map_error(status: reqwest::StatusCode, retry_after: Option<u64>, body: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::InvalidCredentials(body.to_string()),
            404 => ProviderError::UnsupportedModel(body.to_string()),
            400 if body.contains("credit balance") => {
                ProviderError::QuotaExhausted(body.to_string())
            }
            429 if body.contains("quota") => ProviderError::QuotaExhausted(body.to_string()),
            429 => ProviderError::RateLimited { retry_after_ms: retry_after },
            500..=599 => {
                ProviderError::UpstreamUnavailable(format!("HTTP {}: {}", status, body))
            }
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion> {
        debug!(model, operation = request.operation.as_str(), "Anthropic invoke");

        let body = Self::build_body(request, model);
        let url = format!("{}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_error(status, retry_after, &body));
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {}", e)))?;

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
            })
            .ok_or_else(|| ProviderError::Unknown("response contained no text block".to_string()))?;

        Ok(RawCompletion {
            text,
            model: model.to_string(),
        })
    }
}

// Anthropic wire types

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<AnthropicMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use reqwest::StatusCode;

    #[test]
    fn system_field_carries_language_directive() {
        let request =
            PromptRequest::new(OperationKind::Generate, "a harbor at dawn").with_language("Spanish");
        let body = AnthropicAdapter::build_body(&request, "claude-sonnet-4-20250514");

        assert!(body.system.contains("Respond strictly in Spanish."));
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
        assert!(body.messages[0].content.contains("a harbor at dawn"));
    }

    #[test]
    fn auto_detect_directive_when_language_unset() {
        let request = PromptRequest::new(OperationKind::Suggest, "jazz");
        let body = AnthropicAdapter::build_body(&request, "claude-sonnet-4-20250514");
        assert!(body.system.contains("Detect the language of the user's input"));
    }

    #[test]
    fn status_mapping() {
        let err = AnthropicAdapter::map_error(StatusCode::UNAUTHORIZED, None, "invalid x-api-key");
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));

        let err = AnthropicAdapter::map_error(
            StatusCode::BAD_REQUEST,
            None,
            "Your credit balance is too low",
        );
        assert!(matches!(err, ProviderError::QuotaExhausted(_)));

        let err = AnthropicAdapter::map_error(StatusCode::TOO_MANY_REQUESTS, Some(1000), "busy");
        assert!(matches!(
            err,
            ProviderError::RateLimited { retry_after_ms: Some(1000) }
        ));

        // 529 (overloaded) falls in the 5xx band
        let err = AnthropicAdapter::map_error(
            StatusCode::from_u16(529).expect("valid status"),
            None,
            "overloaded",
        );
        assert!(matches!(err, ProviderError::UpstreamUnavailable(_)));
    }
}
