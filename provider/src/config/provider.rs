use serde::{Deserialize, Serialize};

/// Explicit configuration for one adapter instance.
///
/// Credentials are always passed in here, never read from a global at call
/// time, so tests can inject fakes and two adapters for the same provider
/// can carry different keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// HTTP client timeout; deep model variants are observed taking
    /// 30-60s, so the default is generous.
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            api_key: None,
            base_url: None,
            timeout_ms: 60_000,
        }
    }
}
