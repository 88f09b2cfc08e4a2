//! Mistral provider adapter

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

const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

/// Mistral adapter: bearer-token auth against its chat completions endpoint.
#[derive(Debug)]
pub struct MistralAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl MistralAdapter {
    /// Create the adapter from environment configuration.
    ///
    /// Reads `MISTRAL_API_KEY`, optionally `MISTRAL_BASE_URL`.
    pub fn from_env() -> ProviderResult<Self> {
        let api_key = std::env::var(keys::MISTRAL_API_KEY).map_err(|_| {
            ProviderError::InvalidCredentials(format!("{} not set", keys::MISTRAL_API_KEY))
        })?;

        let base_url = std::env::var(keys::MISTRAL_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(ProviderConfig {
            name: ProviderKind::Mistral.as_str().to_string(),
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

    fn build_body(request: &PromptRequest, model: &str) -> MistralRequest {
        MistralRequest {
            model: model.to_string(),
            messages: vec![
                MistralMessage {
                    role: "system".to_string(),
                    content: instructions::system_prompt(request),
                },
                MistralMessage {
                    role: "user".to_string(),
                    content: instructions::user_prompt(request),
                },
            ],
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    fn map_error(status: reqwest::StatusCode, retry_after: Option<u64>, body: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::InvalidCredentials(body.to_string()),
            404 => ProviderError::UnsupportedModel(body.to_string()),
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
impl ProviderAdapter for MistralAdapter {
    fn name(&self) -> &str {
        "mistral"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Mistral
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion> {
        debug!(model, operation = request.operation.as_str(), "Mistral invoke");

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

        let parsed: MistralResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {}", e)))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::Unknown("response contained no choices".to_string()))?;

        Ok(RawCompletion {
            text,
            model: model.to_string(),
        })
    }
}

// Mistral wire types

#[derive(Debug, Serialize)]
struct MistralRequest {
    model: String,
    messages: Vec<MistralMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MistralMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MistralResponse {
    choices: Vec<MistralChoice>,
}

#[derive(Debug, Deserialize)]
struct MistralChoice {
    message: MistralResponseMessage,
}

#[derive(Debug, Deserialize)]
struct MistralResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use reqwest::StatusCode;

    #[test]
    fn body_carries_language_directive() {
        let request =
            PromptRequest::new(OperationKind::Generate, "a winter market").with_language("Spanish");
        let body = MistralAdapter::build_body(&request, "mistral-large-latest");

        assert_eq!(body.messages[0].role, "system");
        assert!(body.messages[0].content.contains("Respond strictly in Spanish."));
        assert!(body.messages[1].content.contains("a winter market"));
    }

    #[test]
    fn auto_detect_directive_when_language_unset() {
        let request = PromptRequest::new(OperationKind::Suggest, "gardening");
        let body = MistralAdapter::build_body(&request, "mistral-small-latest");
        assert!(body.messages[0]
            .content
            .contains("Detect the language of the user's input"));
    }

    #[test]
    fn status_mapping() {
        let err = MistralAdapter::map_error(StatusCode::UNAUTHORIZED, None, "unauthorized");
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));

        let err = MistralAdapter::map_error(StatusCode::TOO_MANY_REQUESTS, None, "quota exceeded");
        assert!(matches!(err, ProviderError::QuotaExhausted(_)));

        let err = MistralAdapter::map_error(StatusCode::INTERNAL_SERVER_ERROR, None, "oops");
        assert!(matches!(err, ProviderError::UpstreamUnavailable(_)));
    }
}
