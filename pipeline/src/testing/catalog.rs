//! Static in-memory model catalog

use std::collections::HashMap;

use async_trait::async_trait;

use crate::api::ModelDescriptor;
use crate::spi::ModelCatalog;

/// Fixed [`ModelCatalog`] built up with a fluent API; stands in for the
/// externally administered configuration store.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    models: HashMap<String, ModelDescriptor>,
    tier_defaults: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a model descriptor.
    pub fn with_model(mut self, descriptor: ModelDescriptor) -> Self {
        self.models.insert(descriptor.model_id.clone(), descriptor);
        self
    }

    /// Set a tier's default model id.
    pub fn with_tier_default(mut self, tier: &str, model_id: &str) -> Self {
        self.tier_defaults
            .insert(tier.to_string(), model_id.to_string());
        self
    }
}

#[async_trait]
impl ModelCatalog for StaticCatalog {
    async fn lookup_model(&self, model_id: &str) -> Option<ModelDescriptor> {
        self.models.get(model_id).cloned()
    }

    async fn default_model_for_tier(&self, tier: &str) -> Option<String> {
        self.tier_defaults.get(tier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsmith_provider::ProviderKind;

    #[tokio::test]
    async fn lookup_and_tier_default() {
        let catalog = StaticCatalog::new()
            .with_model(ModelDescriptor {
                model_id: "swift-1".to_string(),
                provider: ProviderKind::Mistral,
                credit_cost: 2,
                supports_suggestions: false,
            })
            .with_tier_default("pro", "swift-1");

        let descriptor = catalog.lookup_model("swift-1").await.expect("found");
        assert_eq!(descriptor.provider, ProviderKind::Mistral);

        assert_eq!(
            catalog.default_model_for_tier("pro").await.as_deref(),
            Some("swift-1")
        );
        assert!(catalog.default_model_for_tier("free").await.is_none());
        assert!(catalog.lookup_model("missing").await.is_none());
    }
}
