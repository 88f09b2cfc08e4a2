//! Model resolution - from an optional model id to a priced descriptor

use std::sync::Arc;
use tracing::debug;

use crate::api::{ConfigurationError, ModelDescriptor};
use crate::spi::ModelCatalog;

/// Resolves which model (and therefore which provider and price) a request
/// runs against. Pure lookup over the catalog; no side effects, safe to
/// call concurrently and repeatedly.
pub struct ModelResolver {
    catalog: Arc<dyn ModelCatalog>,
}

impl ModelResolver {
    pub fn new(catalog: Arc<dyn ModelCatalog>) -> Self {
        Self { catalog }
    }

    /// Resolve an explicit model id, or the tier's default when absent.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::NoDefaultForTier`] when no model id was given
    /// and the tier has no configured default;
    /// [`ConfigurationError::UnknownModel`] when the id (explicit or
    /// defaulted) is not in the catalog.
    pub async fn resolve(
        &self,
        model_id: Option<&str>,
        tier: &str,
    ) -> Result<ModelDescriptor, ConfigurationError> {
        let model_id = match model_id {
            Some(id) => id.to_string(),
            None => self
                .catalog
                .default_model_for_tier(tier)
                .await
                .ok_or_else(|| ConfigurationError::NoDefaultForTier(tier.to_string()))?,
        };

        let descriptor = self
            .catalog
            .lookup_model(&model_id)
            .await
            .ok_or(ConfigurationError::UnknownModel(model_id))?;

        debug!(
            model = %descriptor.model_id,
            provider = %descriptor.provider,
            cost = descriptor.credit_cost,
            "Resolved model"
        );
        Ok(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticCatalog;
    use promptsmith_provider::ProviderKind;

    fn catalog() -> Arc<StaticCatalog> {
        Arc::new(
            StaticCatalog::new()
                .with_model(ModelDescriptor {
                    model_id: "swift-1".to_string(),
                    provider: ProviderKind::OpenAi,
                    credit_cost: 1,
                    supports_suggestions: true,
                })
                .with_tier_default("free", "swift-1"),
        )
    }

    #[tokio::test]
    async fn explicit_model_resolves() {
        let resolver = ModelResolver::new(catalog());
        let descriptor = resolver.resolve(Some("swift-1"), "free").await.expect("resolved");
        assert_eq!(descriptor.credit_cost, 1);
    }

    #[tokio::test]
    async fn missing_model_uses_tier_default() {
        let resolver = ModelResolver::new(catalog());
        let descriptor = resolver.resolve(None, "free").await.expect("resolved");
        assert_eq!(descriptor.model_id, "swift-1");
    }

    #[tokio::test]
    async fn unknown_model_is_an_error() {
        let resolver = ModelResolver::new(catalog());
        let err = resolver.resolve(Some("missing"), "free").await.unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownModel(_)));
    }

    #[tokio::test]
    async fn tier_without_default_is_an_error() {
        let resolver = ModelResolver::new(catalog());
        let err = resolver.resolve(None, "enterprise").await.unwrap_err();
        assert!(matches!(err, ConfigurationError::NoDefaultForTier(_)));
    }
}
