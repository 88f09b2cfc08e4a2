//! Adapter registry - routes a provider kind to its adapter instance

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::api::ProviderKind;
use crate::config::ProviderConfig;
use crate::spi::{
    AnthropicAdapter, CohereAdapter, GeminiAdapter, MistralAdapter, OpenAiAdapter, ProviderAdapter,
};

/// Immutable lookup table from [`ProviderKind`] to a shared adapter.
///
/// Built once at startup (directly or via [`ProviderRegistryBuilder`]) and
/// then only read; a registry serves any number of concurrent requests.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// Register an adapter under its own kind, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        let kind = adapter.kind();
        debug!(provider = %kind, "Registering provider adapter");
        self.adapters.insert(kind, adapter);
    }

    /// Look up the adapter for a provider kind.
    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&kind).map(Arc::clone)
    }

    /// Kinds with a registered adapter.
    pub fn kinds(&self) -> Vec<ProviderKind> {
        self.adapters.keys().copied().collect()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapter is registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Builder for assembling a registry with explicit per-provider configs.
///
/// # Example
/// ```no_run
/// use promptsmith_provider::{ProviderConfig, ProviderRegistryBuilder};
///
/// let registry = ProviderRegistryBuilder::new()
///     .with_openai(ProviderConfig {
///         api_key: Some("sk-...".to_string()),
///         ..Default::default()
///     })
///     .build();
/// ```
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Add an OpenAI adapter.
    pub fn with_openai(mut self, config: ProviderConfig) -> Self {
        self.adapters.push(Arc::new(OpenAiAdapter::new(config)));
        self
    }

    /// Add an Anthropic adapter.
    pub fn with_anthropic(mut self, config: ProviderConfig) -> Self {
        self.adapters.push(Arc::new(AnthropicAdapter::new(config)));
        self
    }

    /// Add a Gemini adapter.
    pub fn with_gemini(mut self, config: ProviderConfig) -> Self {
        self.adapters.push(Arc::new(GeminiAdapter::new(config)));
        self
    }

    /// Add a Mistral adapter.
    pub fn with_mistral(mut self, config: ProviderConfig) -> Self {
        self.adapters.push(Arc::new(MistralAdapter::new(config)));
        self
    }

    /// Add a Cohere adapter.
    pub fn with_cohere(mut self, config: ProviderConfig) -> Self {
        self.adapters.push(Arc::new(CohereAdapter::new(config)));
        self
    }

    /// Add a custom adapter (e.g. a mock in tests).
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Build the registry.
    pub fn build(self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();
        for adapter in self.adapters {
            registry.register(adapter);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_registers_by_kind() {
        let registry = ProviderRegistryBuilder::new()
            .with_openai(ProviderConfig::default())
            .with_cohere(ProviderConfig::default())
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.get(ProviderKind::OpenAi).is_some());
        assert!(registry.get(ProviderKind::Cohere).is_some());
        assert!(registry.get(ProviderKind::Gemini).is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = ProviderRegistryBuilder::new()
            .with_openai(ProviderConfig {
                api_key: Some("first".to_string()),
                ..Default::default()
            })
            .with_openai(ProviderConfig {
                api_key: Some("second".to_string()),
                ..Default::default()
            })
            .build();

        assert_eq!(registry.len(), 1);
        let adapter = registry.get(ProviderKind::OpenAi).expect("registered");
        assert!(adapter.is_configured());
    }
}
