//! promptsmith-pipeline - the credit-billed generation request pipeline
//!
//! Composes the provider adapters from `promptsmith-provider` with the
//! model catalog and credit ledger owned by external systems, guaranteeing
//! the billing invariant: a caller is never charged for a request that did
//! not produce usable output, and never receives output without being
//! charged exactly the resolved model's credit cost.
//!
//! # Architecture
//!
//! ```text
//! Facade - lib.rs: re-exports, factory
//! Core   - core/: GenerationPipeline, resolver, credit guard, normalizer
//! API    - api/: GenerationService trait (consumer interface)
//! SPI    - spi/: ModelCatalog + CreditLedger contracts
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use promptsmith_pipeline::{create_pipeline, GenerationRequest, GenerationService};
//!
//! let pipeline = create_pipeline(registry, catalog, ledger, PipelineConfig::default());
//! let result = pipeline
//!     .generate(GenerationRequest::generate("acct-1", "a fox in the snow"))
//!     .await?;
//! println!("{} ({} credits)", result.text, result.credits_charged);
//! ```

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod core;
pub mod spi;
pub mod testing;

// ── Public re-exports (API surface) ──

pub use api::{
    ConfigurationError, GenerationRequest, GenerationResult, GenerationService, ModelDescriptor,
    PipelineError, PipelineResult, SuggestionCategory, SuggestionResult, DEFAULT_TIER,
};
pub use config::PipelineConfig;
pub use core::GenerationPipeline;
pub use spi::{CreditLedger, LedgerError, ModelCatalog, ReservationId, ReservationState};

/// Factory: assemble the pipeline from its collaborators.
pub fn create_pipeline(
    registry: Arc<promptsmith_provider::ProviderRegistry>,
    catalog: Arc<dyn ModelCatalog>,
    ledger: Arc<dyn CreditLedger>,
    config: PipelineConfig,
) -> GenerationPipeline {
    GenerationPipeline::new(registry, catalog, ledger, config)
}
