use promptsmith_provider::{OperationKind, PromptRequest, ProviderKind};
use serde::{Deserialize, Serialize};

/// Tier assumed when the caller does not supply one.
pub const DEFAULT_TIER: &str = "free";

/// One incoming generation, improvement, or suggestion request.
///
/// Immutable once constructed; the pipeline creates nothing from it except
/// the canonical [`PromptRequest`] handed to the selected adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub operation: OperationKind,
    /// Account to bill.
    pub account_id: String,
    /// Account tier, used only to pick the default model when `model_id`
    /// is absent. Opaque to the pipeline.
    pub tier: String,
    /// Free-text idea, draft prompt, or suggestion topic.
    pub input: String,
    /// Optional extra constraints the output must respect.
    pub constraints: Option<String>,
    /// Output language; `None` means auto-detect from the input.
    pub target_language: Option<String>,
    /// Model to use; `None` means the tier's configured default.
    pub model_id: Option<String>,
}

impl GenerationRequest {
    /// Create a request for the given operation.
    pub fn new(
        operation: OperationKind,
        account_id: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            account_id: account_id.into(),
            tier: DEFAULT_TIER.to_string(),
            input: input.into(),
            constraints: None,
            target_language: None,
            model_id: None,
        }
    }

    /// Create a prompt-generation request.
    pub fn generate(account_id: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(OperationKind::Generate, account_id, input)
    }

    /// Create a prompt-improvement request.
    pub fn improve(account_id: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(OperationKind::Improve, account_id, input)
    }

    /// Create a keyword-suggestion request.
    pub fn suggest(account_id: impl Into<String>, input: impl Into<String>) -> Self {
        Self::new(OperationKind::Suggest, account_id, input)
    }

    /// Set the account tier.
    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = tier.into();
        self
    }

    /// Attach extra constraints.
    pub fn with_constraints(mut self, constraints: impl Into<String>) -> Self {
        self.constraints = Some(constraints.into());
        self
    }

    /// Force a specific output language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = Some(language.into());
        self
    }

    /// Select a specific model.
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Override the operation kind.
    pub(crate) fn with_operation(mut self, operation: OperationKind) -> Self {
        self.operation = operation;
        self
    }

    /// The canonical request handed to a provider adapter.
    pub fn prompt_request(&self) -> PromptRequest {
        PromptRequest {
            operation: self.operation,
            input: self.input.clone(),
            constraints: self.constraints.clone(),
            target_language: self.target_language.clone(),
        }
    }
}

/// Snapshot of one model's routing and pricing entry in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub model_id: String,
    pub provider: ProviderKind,
    /// Price of one request against this model, in credits.
    pub credit_cost: u32,
    /// Whether suggestion requests may route to this model.
    pub supports_suggestions: bool,
}

/// Successful outcome of a generate/improve request.
///
/// Only produced after the ledger commit was acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    /// Normalized output text.
    pub text: String,
    pub credits_charged: u32,
    pub provider: ProviderKind,
}

/// One named group of keyword suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionCategory {
    pub category: String,
    pub suggestions: Vec<String>,
}

/// Successful outcome of a suggestion request.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionResult {
    pub categories: Vec<SuggestionCategory>,
    pub credits_charged: u32,
    pub provider: ProviderKind,
}
