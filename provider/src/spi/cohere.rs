//! Cohere provider adapter
//!
//! Unlike the chat-style upstreams, Cohere's generate endpoint takes one
//! combined prompt string, so the canonical request is flattened through
//! [`instructions::combined_prompt`].

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

const DEFAULT_BASE_URL: &str = "https://api.cohere.ai/v1";

/// Cohere adapter: bearer-token auth against the generate endpoint.
#[derive(Debug)]
pub struct CohereAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CohereAdapter {
    /// Create the adapter from environment configuration.
    ///
    /// Reads `COHERE_API_KEY`, optionally `COHERE_BASE_URL`.
    pub fn from_env() -> ProviderResult<Self> {
        let api_key = std::env::var(keys::COHERE_API_KEY).map_err(|_| {
            ProviderError::InvalidCredentials(format!("{} not set", keys::COHERE_API_KEY))
        })?;

        let base_url = std::env::var(keys::COHERE_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(ProviderConfig {
            name: ProviderKind::Cohere.as_str().to_string(),
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

    fn build_body(request: &PromptRequest, model: &str) -> CohereRequest {
        CohereRequest {
            model: model.to_string(),
            prompt: instructions::combined_prompt(request),
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
impl ProviderAdapter for CohereAdapter {
    fn name(&self) -> &str {
        "cohere"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Cohere
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion> {
        debug!(model, operation = request.operation.as_str(), "Cohere invoke");

        let body = Self::build_body(request, model);
        let url = format!("{}/generate", self.base_url);
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

        let parsed: CohereResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {}", e)))?;

        let text = parsed
            .generations
            .into_iter()
            .next()
            .map(|generation| generation.text)
            .ok_or_else(|| {
                ProviderError::Unknown("response contained no generations".to_string())
            })?;

        Ok(RawCompletion {
            text,
            model: model.to_string(),
        })
    }
}

// Cohere wire types

#[derive(Debug, Serialize)]
struct CohereRequest {
    model: String,
    prompt: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CohereResponse {
    #[serde(default)]
    generations: Vec<CohereGeneration>,
}

#[derive(Debug, Deserialize)]
struct CohereGeneration {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use reqwest::StatusCode;

    #[test]
    fn combined_prompt_carries_language_directive() {
        let request =
            PromptRequest::new(OperationKind::Generate, "a mountain cabin").with_language("Spanish");
        let body = CohereAdapter::build_body(&request, "command");

        assert!(body.prompt.contains("Respond strictly in Spanish."));
        assert!(body.prompt.contains("a mountain cabin"));
    }

    #[test]
    fn combined_prompt_carries_auto_detect_directive() {
        let request = PromptRequest::new(OperationKind::Improve, "draft");
        let body = CohereAdapter::build_body(&request, "command");
        assert!(body.prompt.contains("Detect the language of the user's input"));
    }

    #[test]
    fn status_mapping() {
        let err = CohereAdapter::map_error(StatusCode::FORBIDDEN, None, "forbidden");
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));

        let err = CohereAdapter::map_error(StatusCode::TOO_MANY_REQUESTS, Some(500), "busy");
        assert!(matches!(
            err,
            ProviderError::RateLimited { retry_after_ms: Some(500) }
        ));

        let err = CohereAdapter::map_error(StatusCode::BAD_GATEWAY, None, "down");
        assert!(matches!(err, ProviderError::UpstreamUnavailable(_)));
    }
}
