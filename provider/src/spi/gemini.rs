//! Google Gemini provider adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{transport_error, ProviderAdapter};
use crate::api::{
    instructions, PromptRequest, ProviderError, ProviderKind, ProviderResult, RawCompletion,
};
use crate::config::{keys, ProviderConfig};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini adapter: the API key travels as a `key` query parameter, the
/// system instruction as a `systemInstruction` block next to the contents.
#[derive(Debug)]
pub struct GeminiAdapter {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiAdapter {
    /// Create the adapter from environment configuration.
    ///
    /// Reads `GEMINI_API_KEY` or `GOOGLE_API_KEY`, optionally
    /// `GEMINI_BASE_URL`.
    pub fn from_env() -> ProviderResult<Self> {
        let api_key = std::env::var(keys::GEMINI_API_KEY)
            .or_else(|_| std::env::var(keys::GOOGLE_API_KEY))
            .map_err(|_| {
                ProviderError::InvalidCredentials(format!(
                    "{} or {} not set",
                    keys::GEMINI_API_KEY,
                    keys::GOOGLE_API_KEY
                ))
            })?;

        let base_url = std::env::var(keys::GEMINI_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(ProviderConfig {
            name: ProviderKind::Gemini.as_str().to_string(),
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

    fn build_body(request: &PromptRequest) -> GeminiRequest {
        GeminiRequest {
            system_instruction: GeminiInstruction {
                parts: vec![GeminiPart {
                    text: instructions::system_prompt(request),
                }],
            },
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: instructions::user_prompt(request),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.7,
                max_output_tokens: 1024,
            },
        }
    }

    /// Map HTTP status and error body to the taxonomy.
    ///
    /// Gemini reports both rate limiting and quota exhaustion as 429
    /// `RESOURCE_EXHAUSTED`; the body's mention of a quota distinguishes
    /// the two. Invalid keys arrive as 400 `API_KEY_INVALID`.
    fn map_error(status: reqwest::StatusCode, body: &str) -> ProviderError {
        match status.as_u16() {
            400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
                ProviderError::InvalidCredentials(body.to_string())
            }
            401 | 403 => ProviderError::InvalidCredentials(body.to_string()),
            404 => ProviderError::UnsupportedModel(body.to_string()),
            429 if body.contains("quota") => ProviderError::QuotaExhausted(body.to_string()),
            429 => ProviderError::RateLimited { retry_after_ms: None },
            500..=599 => {
                ProviderError::UpstreamUnavailable(format!("HTTP {}: {}", status, body))
            }
            _ => ProviderError::Unknown(format!("HTTP {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &str {
        "gemini"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn invoke(&self, request: &PromptRequest, model: &str) -> ProviderResult<RawCompletion> {
        debug!(model, operation = request.operation.as_str(), "Gemini invoke");

        let body = Self::build_body(request);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_error(status, &body));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Unknown(format!("malformed response: {}", e)))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| ProviderError::Unknown("response contained no candidates".to_string()))?;

        Ok(RawCompletion {
            text,
            model: model.to_string(),
        })
    }
}

// Gemini wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiInstruction,
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OperationKind;
    use reqwest::StatusCode;

    #[test]
    fn system_instruction_carries_language_directive() {
        let request =
            PromptRequest::new(OperationKind::Generate, "a desert road").with_language("Spanish");
        let body = GeminiAdapter::build_body(&request);

        assert!(body.system_instruction.parts[0]
            .text
            .contains("Respond strictly in Spanish."));
        assert_eq!(body.contents[0].role, "user");
        assert!(body.contents[0].parts[0].text.contains("a desert road"));
    }

    #[test]
    fn auto_detect_directive_when_language_unset() {
        let request = PromptRequest::new(OperationKind::Improve, "draft");
        let body = GeminiAdapter::build_body(&request);
        assert!(body.system_instruction.parts[0]
            .text
            .contains("Detect the language of the user's input"));
    }

    #[test]
    fn status_mapping() {
        let err = GeminiAdapter::map_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"status":"INVALID_ARGUMENT","message":"API key not valid"}}"#,
        );
        assert!(matches!(err, ProviderError::InvalidCredentials(_)));

        let err = GeminiAdapter::map_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"status":"RESOURCE_EXHAUSTED","message":"You exceeded your current quota"}}"#,
        );
        assert!(matches!(err, ProviderError::QuotaExhausted(_)));

        let err = GeminiAdapter::map_error(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, ProviderError::RateLimited { .. }));

        let err = GeminiAdapter::map_error(StatusCode::SERVICE_UNAVAILABLE, "down");
        assert!(matches!(err, ProviderError::UpstreamUnavailable(_)));
    }
}
