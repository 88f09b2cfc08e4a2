//! The generation pipeline entry point
//!
//! Composes resolver → credit guard → provider adapter → normalizer →
//! ledger finalization. Per request the lifecycle is strictly:
//!
//! 1. Resolving - model lookup, suggestion-capability check, adapter lookup
//! 2. Reserving - atomic credit hold (terminal on insufficient credits)
//! 3. Invoking - one provider call under a bounded timeout
//! 4. Normalizing - pure text cleanup, cannot fail
//! 5. Committing - hold becomes debit, retried on transient ledger faults
//!
//! Any failure after a successful hold releases it before the error is
//! surfaced, except a commit failure: at that point the user has output,
//! so the hold is kept and the request is flagged for reconciliation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use promptsmith_provider::{
    OperationKind, ProviderError, ProviderRegistry, RawCompletion,
};
use tracing::{debug, error, info};

use crate::api::{
    ConfigurationError, GenerationRequest, GenerationResult, GenerationService, ModelDescriptor,
    PipelineError, PipelineResult, SuggestionResult,
};
use crate::config::PipelineConfig;
use crate::core::guard::{CreditGuard, Reservation};
use crate::core::resolver::ModelResolver;
use crate::core::{normalizer, suggestions};
use crate::core::resilience::with_ledger_retry;
use crate::spi::{CreditLedger, ModelCatalog};

/// Default implementation of [`GenerationService`].
pub struct GenerationPipeline {
    registry: Arc<ProviderRegistry>,
    resolver: ModelResolver,
    guard: CreditGuard,
    ledger: Arc<dyn CreditLedger>,
    config: PipelineConfig,
}

impl GenerationPipeline {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        catalog: Arc<dyn ModelCatalog>,
        ledger: Arc<dyn CreditLedger>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            resolver: ModelResolver::new(catalog),
            guard: CreditGuard::new(Arc::clone(&ledger)),
            ledger,
            config,
        }
    }

    /// Resolve the request's model and verify an adapter exists for it.
    ///
    /// Runs before any billing so configuration problems never touch the
    /// ledger.
    async fn resolve(&self, request: &GenerationRequest) -> PipelineResult<ModelDescriptor> {
        let descriptor = self
            .resolver
            .resolve(request.model_id.as_deref(), &request.tier)
            .await?;

        if self.registry.get(descriptor.provider).is_none() {
            return Err(ConfigurationError::ProviderNotRegistered(descriptor.provider).into());
        }

        Ok(descriptor)
    }

    /// One provider call under the configured timeout.
    async fn invoke(
        &self,
        descriptor: &ModelDescriptor,
        request: &GenerationRequest,
    ) -> PipelineResult<RawCompletion> {
        let adapter = self
            .registry
            .get(descriptor.provider)
            .ok_or(ConfigurationError::ProviderNotRegistered(descriptor.provider))?;

        let prompt = request.prompt_request();
        let timeout = Duration::from_millis(self.config.invoke_timeout_ms);

        match tokio::time::timeout(timeout, adapter.invoke(&prompt, &descriptor.model_id)).await {
            Ok(result) => result.map_err(PipelineError::Provider),
            Err(_) => Err(PipelineError::Provider(ProviderError::UpstreamUnavailable(
                format!("no response within {}ms", self.config.invoke_timeout_ms),
            ))),
        }
    }

    /// Invoke the provider with the reservation held; on any failure the
    /// hold is released before the error propagates.
    async fn invoke_with_rollback(
        &self,
        descriptor: &ModelDescriptor,
        request: &GenerationRequest,
        reservation: Reservation,
    ) -> PipelineResult<(RawCompletion, Reservation)> {
        match self.invoke(descriptor, request).await {
            Ok(raw) => Ok((raw, reservation)),
            Err(e) => {
                debug!(error = %e, "Provider call failed, releasing reservation");
                if let Err(rollback_err) = reservation.rollback().await {
                    error!(
                        error = %rollback_err,
                        "Rollback after provider failure did not complete"
                    );
                }
                Err(e)
            }
        }
    }

    /// Convert the hold into a debit, retrying transient ledger faults.
    ///
    /// Output already exists here, so failure must not release the hold and
    /// must not be silent: it surfaces as [`PipelineError::LedgerInconsistent`]
    /// with the reservation id for out-of-band reconciliation.
    async fn commit(&self, reservation: Reservation) -> PipelineResult<u64> {
        let amount = reservation.amount();
        let id = reservation.defuse();
        let ledger = Arc::clone(&self.ledger);

        let committed = with_ledger_retry(
            self.config.commit_max_retries,
            self.config.commit_initial_backoff_ms,
            self.config.commit_max_backoff_ms,
            || {
                let ledger = Arc::clone(&ledger);
                let id = id.clone();
                async move { ledger.commit(&id).await }
            },
        )
        .await;

        match committed {
            Ok(new_balance) => {
                debug!(reservation = %id, amount, new_balance, "Ledger commit confirmed");
                Ok(new_balance)
            }
            Err(e) => {
                error!(
                    reservation = %id,
                    amount,
                    error = %e,
                    "Ledger commit failed after retries; output was produced and the hold is \
                     kept pending reconciliation"
                );
                Err(PipelineError::LedgerInconsistent {
                    reservation_id: id.to_string(),
                    detail: e.to_string(),
                })
            }
        }
    }

    /// Shared lifecycle for generate and improve.
    async fn run_text(&self, request: GenerationRequest) -> PipelineResult<GenerationResult> {
        debug!(
            account = %request.account_id,
            operation = request.operation.as_str(),
            "Starting generation request"
        );

        let descriptor = self.resolve(&request).await?;
        let reservation = self
            .guard
            .reserve(&request.account_id, u64::from(descriptor.credit_cost))
            .await?;

        let (raw, reservation) = self
            .invoke_with_rollback(&descriptor, &request, reservation)
            .await?;

        let text = normalizer::clean(&raw.text);
        self.commit(reservation).await?;

        info!(
            account = %request.account_id,
            model = %descriptor.model_id,
            provider = %descriptor.provider,
            credits = descriptor.credit_cost,
            "Generation request completed"
        );

        Ok(GenerationResult {
            text,
            credits_charged: descriptor.credit_cost,
            provider: descriptor.provider,
        })
    }
}

#[async_trait]
impl GenerationService for GenerationPipeline {
    async fn generate(&self, request: GenerationRequest) -> PipelineResult<GenerationResult> {
        self.run_text(request.with_operation(OperationKind::Generate)).await
    }

    async fn improve(&self, request: GenerationRequest) -> PipelineResult<GenerationResult> {
        self.run_text(request.with_operation(OperationKind::Improve)).await
    }

    async fn suggest(&self, request: GenerationRequest) -> PipelineResult<SuggestionResult> {
        let request = request.with_operation(OperationKind::Suggest);
        debug!(account = %request.account_id, "Starting suggestion request");

        let descriptor = self.resolve(&request).await?;
        if !descriptor.supports_suggestions {
            return Err(PipelineError::UnsupportedBySelectedModel(
                descriptor.model_id,
            ));
        }

        let reservation = self
            .guard
            .reserve(&request.account_id, u64::from(descriptor.credit_cost))
            .await?;

        let (raw, reservation) = self
            .invoke_with_rollback(&descriptor, &request, reservation)
            .await?;

        let categories = suggestions::parse_suggestions(&normalizer::clean(&raw.text));
        self.commit(reservation).await?;

        info!(
            account = %request.account_id,
            model = %descriptor.model_id,
            categories = categories.len(),
            credits = descriptor.credit_cost,
            "Suggestion request completed"
        );

        Ok(SuggestionResult {
            categories,
            credits_charged: descriptor.credit_cost,
            provider: descriptor.provider,
        })
    }
}
