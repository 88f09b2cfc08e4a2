//! Deployment-level provider configuration
//!
//! Maps each [`ProviderKind`] to the environment variables that carry its
//! credentials and endpoint. Loadable from YAML so deployments can point a
//! provider at a proxy or swap the variable names without code changes:
//!
//! ```yaml
//! providers:
//!   openai:
//!     api_key_env: OPENAI_API_KEY
//!     base_url_env: OPENAI_BASE_URL
//!     default_base_url: https://api.openai.com/v1
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::keys;
use crate::api::ProviderKind;

/// How to resolve one provider's credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Fallback environment variable for the API key.
    #[serde(default)]
    pub alt_api_key_env: Option<String>,

    /// Environment variable for a custom base URL.
    #[serde(default)]
    pub base_url_env: Option<String>,

    /// Base URL used when the environment does not override it.
    #[serde(default)]
    pub default_base_url: Option<String>,
}

/// Registry of provider specs, keyed by provider identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub providers: HashMap<String, ProviderSpec>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        let mut providers = HashMap::new();

        providers.insert(
            ProviderKind::OpenAi.as_str().to_string(),
            ProviderSpec {
                api_key_env: keys::OPENAI_API_KEY.to_string(),
                alt_api_key_env: None,
                base_url_env: Some(keys::OPENAI_BASE_URL.to_string()),
                default_base_url: Some("https://api.openai.com/v1".to_string()),
            },
        );

        providers.insert(
            ProviderKind::Anthropic.as_str().to_string(),
            ProviderSpec {
                api_key_env: keys::ANTHROPIC_API_KEY.to_string(),
                alt_api_key_env: None,
                base_url_env: Some(keys::ANTHROPIC_BASE_URL.to_string()),
                default_base_url: Some("https://api.anthropic.com/v1".to_string()),
            },
        );

        providers.insert(
            ProviderKind::Gemini.as_str().to_string(),
            ProviderSpec {
                api_key_env: keys::GEMINI_API_KEY.to_string(),
                alt_api_key_env: Some(keys::GOOGLE_API_KEY.to_string()),
                base_url_env: Some(keys::GEMINI_BASE_URL.to_string()),
                default_base_url: Some(
                    "https://generativelanguage.googleapis.com/v1beta".to_string(),
                ),
            },
        );

        providers.insert(
            ProviderKind::Mistral.as_str().to_string(),
            ProviderSpec {
                api_key_env: keys::MISTRAL_API_KEY.to_string(),
                alt_api_key_env: None,
                base_url_env: Some(keys::MISTRAL_BASE_URL.to_string()),
                default_base_url: Some("https://api.mistral.ai/v1".to_string()),
            },
        );

        providers.insert(
            ProviderKind::Cohere.as_str().to_string(),
            ProviderSpec {
                api_key_env: keys::COHERE_API_KEY.to_string(),
                alt_api_key_env: None,
                base_url_env: Some(keys::COHERE_BASE_URL.to_string()),
                default_base_url: Some("https://api.cohere.ai/v1".to_string()),
            },
        );

        Self { providers }
    }
}

impl ProvidersConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Get the spec for a provider.
    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderSpec> {
        self.providers.get(kind.as_str())
    }

    /// Resolve a provider's API key from the environment.
    pub fn resolve_api_key(&self, kind: ProviderKind) -> Option<String> {
        let spec = self.get(kind)?;

        if let Ok(key) = std::env::var(&spec.api_key_env) {
            if !key.is_empty() {
                return Some(key);
            }
        }

        if let Some(ref alt_env) = spec.alt_api_key_env {
            if let Ok(key) = std::env::var(alt_env) {
                if !key.is_empty() {
                    return Some(key);
                }
            }
        }

        None
    }

    /// Resolve a provider's base URL: environment override first, then the
    /// configured default.
    pub fn resolve_base_url(&self, kind: ProviderKind) -> Option<String> {
        let spec = self.get(kind)?;

        if let Some(ref env_var) = spec.base_url_env {
            if let Ok(url) = std::env::var(env_var) {
                if !url.is_empty() {
                    return Some(url);
                }
            }
        }

        spec.default_base_url.clone()
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
