//! Instruction templates shared by every adapter.
//!
//! All five upstreams must express the same intent for a given canonical
//! request, so the operation instructions and the language directive are
//! built here and only re-shaped (system/user split vs. one combined
//! string) inside the adapters.

use super::types::{OperationKind, PromptRequest};

/// Base instruction for an operation, without the language directive.
pub fn operation_instruction(operation: OperationKind) -> String {
    match operation {
        OperationKind::Generate => r#"You are a prompt engineer for generative AI tools.

Your task: turn the user's idea into one complete, effective prompt.

Rules:
- Output ONLY the prompt text, nothing else.
- Do not include explanations, markdown, or surrounding quotes.
- Make the prompt specific: subject, style, context, desired output shape.
- Respect any additional constraints the user provides."#
            .to_string(),
        OperationKind::Improve => r#"You are a prompt engineer for generative AI tools.

Your task: rewrite the user's draft prompt so it is clearer and more effective.

Rules:
- Output ONLY the improved prompt text, nothing else.
- Do not include explanations, markdown, or surrounding quotes.
- Preserve the user's intent; sharpen wording, structure, and specificity.
- Respect any additional constraints the user provides."#
            .to_string(),
        OperationKind::Suggest => r#"You are a keyword assistant for generative AI prompts.

Your task: suggest keywords related to the user's topic, grouped by category.

Rules:
- Output one line per category, formatted exactly as: <category>: <keyword>; <keyword>; <keyword>
- Give 3-5 keywords per category.
- Do not include numbering, bullets, or any other text.
- Respect any additional constraints the user provides."#
            .to_string(),
    }
}

/// The output-language directive.
///
/// Identical wording across all adapters so behavior does not drift between
/// providers: an explicit target language is mandatory, otherwise the model
/// must mirror the input's language.
pub fn language_directive(target_language: Option<&str>) -> String {
    match target_language {
        Some(language) => format!("Respond strictly in {}.", language),
        None => {
            "Detect the language of the user's input and respond in that same language."
                .to_string()
        }
    }
}

/// Full system instruction: operation rules plus language directive.
pub fn system_prompt(request: &PromptRequest) -> String {
    format!(
        "{}\n\n{}",
        operation_instruction(request.operation),
        language_directive(request.target_language.as_deref())
    )
}

/// User-role content: the input plus any constraints.
pub fn user_prompt(request: &PromptRequest) -> String {
    match &request.constraints {
        Some(constraints) => format!(
            "{}\n\nAdditional constraints:\n{}",
            request.input, constraints
        ),
        None => request.input.clone(),
    }
}

/// Single combined prompt for upstreams that take one string instead of a
/// system/user message pair.
pub fn combined_prompt(request: &PromptRequest) -> String {
    format!("{}\n\n{}", system_prompt(request), user_prompt(request))
}
