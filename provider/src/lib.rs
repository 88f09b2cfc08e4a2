//! promptsmith-provider - uniform adapters over heterogeneous model APIs
//!
//! This crate hides five structurally different upstream language-model
//! APIs (auth schemes, request envelopes, error shapes, rate-limit
//! signaling) behind one [`ProviderAdapter`] contract. The generation
//! pipeline selects an adapter by [`ProviderKind`] and never sees a
//! provider-native type.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use promptsmith_provider::{registry_from_config, ProvidersConfig};
//!
//! let registry = registry_from_config(&ProvidersConfig::default());
//! let adapter = registry.get(ProviderKind::OpenAi).unwrap();
//! let completion = adapter.invoke(&request, "gpt-4o").await?;
//! ```

use std::sync::Arc;

// =============================================================================
// Internal Modules
// =============================================================================

mod api;
mod config;
mod core;
mod spi;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// =============================================================================
// Public API - Types & Errors (from api/)
// =============================================================================

pub use api::{
    instructions, OperationKind, PromptRequest, ProviderError, ProviderKind, ProviderResult,
    RawCompletion,
};

// =============================================================================
// Public API - Configuration
// =============================================================================

pub use config::{keys, ConfigError, ProviderConfig, ProviderSpec, ProvidersConfig};

// =============================================================================
// Public API - Adapter Trait & Implementations (from spi/)
// =============================================================================

pub use spi::{
    AnthropicAdapter, CohereAdapter, GeminiAdapter, MistralAdapter, OpenAiAdapter, ProviderAdapter,
};

// =============================================================================
// Public API - Registry (from core/)
// =============================================================================

pub use core::{ProviderRegistry, ProviderRegistryBuilder};

// =============================================================================
// Factory Functions
// =============================================================================

/// Build a registry containing every provider whose API key resolves from
/// the environment according to `config`.
///
/// Providers without a resolvable key are skipped, not errors: a deployment
/// typically configures a subset of the five upstreams, and the pipeline
/// reports a configuration error only when a request actually routes to a
/// missing one.
pub fn registry_from_config(config: &ProvidersConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    for kind in ProviderKind::ALL {
        let Some(api_key) = config.resolve_api_key(kind) else {
            tracing::debug!(provider = %kind, "No API key resolved, skipping adapter");
            continue;
        };

        let provider_config = ProviderConfig {
            name: kind.as_str().to_string(),
            api_key: Some(api_key),
            base_url: config.resolve_base_url(kind),
            ..Default::default()
        };

        let adapter: Arc<dyn ProviderAdapter> = match kind {
            ProviderKind::OpenAi => Arc::new(OpenAiAdapter::new(provider_config)),
            ProviderKind::Anthropic => Arc::new(AnthropicAdapter::new(provider_config)),
            ProviderKind::Gemini => Arc::new(GeminiAdapter::new(provider_config)),
            ProviderKind::Mistral => Arc::new(MistralAdapter::new(provider_config)),
            ProviderKind::Cohere => Arc::new(CohereAdapter::new(provider_config)),
        };

        tracing::info!(provider = %kind, "Registered provider adapter");
        registry.register(adapter);
    }

    registry
}
