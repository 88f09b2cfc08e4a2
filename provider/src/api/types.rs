use serde::{Deserialize, Serialize};

/// The logical operation a request asks the model to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Turn a raw idea into a complete prompt.
    Generate,
    /// Rework an existing draft prompt.
    Improve,
    /// Produce categorized keyword suggestions.
    Suggest,
}

impl OperationKind {
    /// Stable lowercase identifier, used in logs and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Generate => "generate",
            OperationKind::Improve => "improve",
            OperationKind::Suggest => "suggest",
        }
    }
}

/// The closed set of supported upstream providers.
///
/// Adding a provider means adding a variant here plus one adapter in `spi/`;
/// nothing else in the pipeline changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Mistral,
    Cohere,
}

impl ProviderKind {
    /// Every supported provider, in registration order.
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Mistral,
        ProviderKind::Cohere,
    ];

    /// Stable identifier (e.g. "openai", "anthropic").
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Mistral => "mistral",
            ProviderKind::Cohere => "cohere",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical, provider-agnostic request handed to an adapter.
///
/// Account and billing context stay in the pipeline; an adapter only sees
/// what it needs to build the upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub operation: OperationKind,
    /// Free-text idea, draft prompt, or suggestion topic.
    pub input: String,
    /// Optional extra constraints the output must respect.
    pub constraints: Option<String>,
    /// Output language. `None` means: detect the input's language and
    /// respond in the same one.
    pub target_language: Option<String>,
}

impl PromptRequest {
    /// Create a request for the given operation.
    pub fn new(operation: OperationKind, input: impl Into<String>) -> Self {
        Self {
            operation,
            input: input.into(),
            constraints: None,
            target_language: None,
        }
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
}

/// Raw text returned by an adapter, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCompletion {
    pub text: String,
    /// The model that produced the text.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_identifiers_are_stable() {
        assert_eq!(ProviderKind::OpenAi.as_str(), "openai");
        assert_eq!(ProviderKind::Cohere.as_str(), "cohere");
        assert_eq!(ProviderKind::ALL.len(), 5);
    }

    #[test]
    fn prompt_request_builder() {
        let request = PromptRequest::new(OperationKind::Improve, "draft")
            .with_constraints("keep it short")
            .with_language("French");
        assert_eq!(request.operation, OperationKind::Improve);
        assert_eq!(request.constraints.as_deref(), Some("keep it short"));
        assert_eq!(request.target_language.as_deref(), Some("French"));
    }
}
