//! Pipeline configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use promptsmith_provider::ConfigError;

/// Environment variable names for pipeline tuning.
pub mod env_keys {
    /// Provider invocation timeout in milliseconds.
    pub const INVOKE_TIMEOUT_MS: &str = "PIPELINE_INVOKE_TIMEOUT_MS";
    /// Maximum ledger commit retries.
    pub const COMMIT_MAX_RETRIES: &str = "PIPELINE_COMMIT_MAX_RETRIES";
    /// Initial commit retry backoff in milliseconds.
    pub const COMMIT_INITIAL_BACKOFF_MS: &str = "PIPELINE_COMMIT_INITIAL_BACKOFF_MS";
    /// Maximum commit retry backoff in milliseconds.
    pub const COMMIT_MAX_BACKOFF_MS: &str = "PIPELINE_COMMIT_MAX_BACKOFF_MS";
}

/// Tuning knobs for the generation pipeline.
///
/// | Field | Default | Purpose |
/// |-------|---------|---------|
/// | `invoke_timeout_ms` | `60000` | Bound on one provider call; deep model variants run 30-60s |
/// | `commit_max_retries` | `3` | Ledger commit retries before flagging inconsistency |
/// | `commit_initial_backoff_ms` | `100` | First commit retry delay |
/// | `commit_max_backoff_ms` | `5000` | Commit retry delay cap |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_invoke_timeout_ms")]
    pub invoke_timeout_ms: u64,

    #[serde(default = "default_commit_max_retries")]
    pub commit_max_retries: u32,

    #[serde(default = "default_commit_initial_backoff_ms")]
    pub commit_initial_backoff_ms: u64,

    #[serde(default = "default_commit_max_backoff_ms")]
    pub commit_max_backoff_ms: u64,
}

fn default_invoke_timeout_ms() -> u64 {
    60_000
}

fn default_commit_max_retries() -> u32 {
    3
}

fn default_commit_initial_backoff_ms() -> u64 {
    100
}

fn default_commit_max_backoff_ms() -> u64 {
    5_000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            invoke_timeout_ms: default_invoke_timeout_ms(),
            commit_max_retries: default_commit_max_retries(),
            commit_initial_backoff_ms: default_commit_initial_backoff_ms(),
            commit_max_backoff_ms: default_commit_max_backoff_ms(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(value) = read_env_u64(env_keys::INVOKE_TIMEOUT_MS) {
            config.invoke_timeout_ms = value;
        }
        if let Some(value) = read_env_u64(env_keys::COMMIT_MAX_RETRIES) {
            config.commit_max_retries = value as u32;
        }
        if let Some(value) = read_env_u64(env_keys::COMMIT_INITIAL_BACKOFF_MS) {
            config.commit_initial_backoff_ms = value;
        }
        if let Some(value) = read_env_u64(env_keys::COMMIT_MAX_BACKOFF_MS) {
            config.commit_max_backoff_ms = value;
        }

        config
    }

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
}

fn read_env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|value| value.parse().ok())
}
