//! Environment variable names for provider credentials and endpoints
//!
//! Centralized so adapters, the registry factory, and deployment docs all
//! agree on the exact variable names.

/// OpenAI API key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Anthropic API key.
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";

/// Google Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Google API key (alternative for Gemini).
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Mistral API key.
pub const MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";

/// Cohere API key.
pub const COHERE_API_KEY: &str = "COHERE_API_KEY";

/// OpenAI custom base URL.
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Anthropic custom base URL.
pub const ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";

/// Gemini custom base URL.
pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

/// Mistral custom base URL.
pub const MISTRAL_BASE_URL: &str = "MISTRAL_BASE_URL";

/// Cohere custom base URL.
pub const COHERE_BASE_URL: &str = "COHERE_BASE_URL";

/// All provider API key variables.
pub const API_KEYS: &[&str] = &[
    OPENAI_API_KEY,
    ANTHROPIC_API_KEY,
    GEMINI_API_KEY,
    GOOGLE_API_KEY,
    MISTRAL_API_KEY,
    COHERE_API_KEY,
];

/// All base URL variables.
pub const BASE_URL_KEYS: &[&str] = &[
    OPENAI_BASE_URL,
    ANTHROPIC_BASE_URL,
    GEMINI_BASE_URL,
    MISTRAL_BASE_URL,
    COHERE_BASE_URL,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_constants_match_their_names() {
        assert_eq!(OPENAI_API_KEY, "OPENAI_API_KEY");
        assert_eq!(COHERE_API_KEY, "COHERE_API_KEY");
        assert!(API_KEYS.contains(&MISTRAL_API_KEY));
        assert!(BASE_URL_KEYS.contains(&GEMINI_BASE_URL));
    }
}
