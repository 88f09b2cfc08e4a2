//! OpenAI provider adapter

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

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI adapter: bearer-token auth against the chat completions endpoint.
#[derive(Debug)]
pub struct OpenAiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiAdapter {
    /// Create the adapter from environment configuration.
    ///
    /// Reads `OPENAI_API_KEY`, optionally `OPENAI_BASE_URL`.
    pub fn from_env() -> ProviderResult<Self> {
        let api_key = std::env::var(keys::OPENAI_API_KEY).map_err(|_| {
            ProviderError::InvalidCredentials(format!("{} not set", keys::OPENAI_API_KEY))
        })?;

        let base_url = std::env::var(keys::OPENAI_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(ProviderConfig {
            name: ProviderKind::OpenAi.as_str().to_string(),
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

    /// Build the wire request; separate from `invoke` so tests can inspect
    /// the exact body without a network call.
    fn build_body(request: &PromptRequest, model: &str) -> OpenAiRequest {
        OpenAiRequest {
            model: model.to_string(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: instructions::system_prompt(request),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: instructions::user_prompt(request),
                },
            ],
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    /// Map HTTP status and error body to the taxonomy.
    ///
    /// OpenAI signals an exhausted plan on 429 with an
    /// `insufficient_quota` error code in the body.
    fn map_error(status: reqwest::StatusCode, retry_after: Option<u64>, body: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::InvalidCredentials(body.to_string()),
            404 => ProviderError::UnsupportedModel(body.to_string()),
            429 if body.contains("insufficient_quota") => {
                ProviderError::QuotaExhausted(body.to_string())
            }
            429 => ProviderError::RateLimited { retry_after_ms: retry_after },
            500..=599 => {
                ProviderError::UpstreamUnavailable(format!("HTTP {}: {}", status, body))
            }
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        "openai"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion> {
        debug!(model, operation = request.operation.as_str(), "OpenAI invoke");

        let body = Self::build_body(request, model);
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
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

        let parsed: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Unknown("response contained no choices".to_string()))?;

        Ok(RawCompletion {
            text,
            model: model.to_string(),
        })
    }
}

// OpenAI wire types

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use reqwest::StatusCode;

    #[test]
    fn body_carries_strict_language_directive() {
        let request =
            PromptRequest::new(OperationKind::Generate, "a lighthouse").with_language("Spanish");
        let body = OpenAiAdapter::build_body(&request, "gpt-4o");

        assert_eq!(body.model, "gpt-4o");
        assert_eq!(body.messages[0].role, "system");
        assert!(body.messages[0].content.contains("Respond strictly in Spanish."));
        assert_eq!(body.messages[1].role, "user");
        assert!(body.messages[1].content.contains("a lighthouse"));
    }

    #[test]
    fn body_carries_auto_detect_directive_when_language_unset() {
        let request = PromptRequest::new(OperationKind::Improve, "draft");
        let body = OpenAiAdapter::build_body(&request, "gpt-4o-mini");
        assert!(body.messages[0]
            .content
            .contains("Detect the language of the user's input"));
    }

    #[test]
    fn body_serializes_to_the_expected_wire_shape() {
        let request = PromptRequest::new(OperationKind::Generate, "a lighthouse");
        let body = OpenAiAdapter::build_body(&request, "gpt-4o");
        let json = serde_json::to_value(&body).expect("serializable");

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["max_tokens"], 1024);
    }

    #[test]
    fn status_mapping() {
        let err = OpenAiAdapter::map_error(StatusCode::UNAUTHORIZED, None, "bad key");
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));

        let err = OpenAiAdapter::map_error(StatusCode::NOT_FOUND, None, "no such model");
        assert!(matches!(err, ProviderError::UnsupportedModel(_)));

        let err = OpenAiAdapter::map_error(
            StatusCode::TOO_MANY_REQUESTS,
            None,
            r#"{"error":{"code":"insufficient_quota"}}"#,
        );
        assert!(matches!(err, ProviderError::QuotaExhausted(_)));

        let err = OpenAiAdapter::map_error(StatusCode::TOO_MANY_REQUESTS, Some(3000), "slow down");
        assert!(matches!(
            err,
            ProviderError::RateLimited { retry_after_ms: Some(3000) }
        ));

        let err = OpenAiAdapter::map_error(StatusCode::BAD_GATEWAY, None, "upstream down");
        assert!(matches!(err, ProviderError::UpstreamUnavailable(_)));

        let err = OpenAiAdapter::map_error(StatusCode::IM_A_TEAPOT, None, "?");
        assert!(matches!(err, ProviderError::Unknown(_)));
    }
}
