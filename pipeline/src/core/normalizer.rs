//! Best-effort cleanup of raw model output
//!
//! Models routinely wrap the requested text in conversational boilerplate:
//! a lead-in sentence ("Sure! Here is the improved prompt:"), a label
//! ("Prompt:"), or quotes around the whole thing. The rules here are
//! ordered, start-anchored rewrites applied over the current state of the
//! string; the whole pass repeats until nothing changes, so `clean` is
//! idempotent. This is inherently heuristic: it targets the preamble shapes
//! observed in practice, not every possible phrasing.

use regex::Regex;
use std::sync::OnceLock;

/// How many full passes to attempt before accepting the current state.
/// Every rule only removes text, so a fixpoint is reached quickly; the cap
/// is a safety bound, not a tuning knob.
const MAX_PASSES: usize = 8;

/// Preamble removal rules, in application order: announcement sentences
/// (with any polite lead-in fused in front) before bare labels, so the
/// broader shapes never leave a partial match behind for the generic ones.
/// Later rules see the output of earlier ones.
fn preamble_rules() -> &'static [Regex] {
    static RULES: OnceLock<Vec<Regex>> = OnceLock::new();
    RULES.get_or_init(|| {
        let patterns = [
            // English announcements, with an optional polite lead-in fused
            // in front: "Sure! Here is the improved prompt:", "Here's your prompt:"
            r"(?i)^\s*(?:(?:sure|certainly|of course|absolutely|okay)[!,.:]?\s+)?here(?:'s| is| are)\b[^:\n]{0,80}:\s*",
            // French: "Voici le prompt amélioré :"
            r"(?i)^\s*voici\b[^:\n]{0,80}:\s*",
            // Spanish: "Aquí tienes el prompt mejorado:"
            r"(?i)^\s*aqu[ií]\s+(?:tienes|está|le presento)\b[^:\n]{0,80}:\s*",
            // bare labels: "Prompt:", "Improved prompt:", "Generated Prompt:"
            r"(?i)^\s*(?:improved|generated|final|new|revised)?\s*prompt\s*:\s*",
        ];
        patterns
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

/// Strip one pair of quotes enclosing the entire text.
fn strip_enclosing_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 3] = [('"', '"'), ('\u{201C}', '\u{201D}'), ('«', '»')];
    for (open, close) in PAIRS {
        if text.len() >= open.len_utf8() + close.len_utf8()
            && text.starts_with(open)
            && text.ends_with(close)
        {
            return text[open.len_utf8()..text.len() - close.len_utf8()].trim();
        }
    }
    text
}

/// Remove conversational preamble, enclosing quotes, and leading blank
/// lines from raw model output.
///
/// Total function: the worst case is the input returned trimmed. Idempotent:
/// `clean(clean(x)) == clean(x)`.
pub fn clean(raw: &str) -> String {
    let mut text = raw.trim().to_string();

    for _ in 0..MAX_PASSES {
        let before = text.clone();

        for rule in preamble_rules() {
            text = rule.replace(&text, "").into_owned();
        }
        text = strip_enclosing_quotes(text.trim()).to_string();

        if text == before {
            break;
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through_trimmed() {
        assert_eq!(clean("  a photo of a fox  \n"), "a photo of a fox");
    }

    #[test]
    fn strips_english_announcement() {
        assert_eq!(
            clean("Here is the improved prompt:\nA photo of a fox"),
            "A photo of a fox"
        );
        assert_eq!(clean("Here's your prompt: A photo of a fox"), "A photo of a fox");
    }

    #[test]
    fn strips_polite_lead_in_with_announcement() {
        assert_eq!(
            clean("Sure! Here is the prompt you asked for:\n\nA photo of a fox"),
            "A photo of a fox"
        );
    }

    #[test]
    fn strips_french_and_spanish_announcements() {
        assert_eq!(
            clean("Voici le prompt amélioré :\nUne photo d'un renard"),
            "Une photo d'un renard"
        );
        assert_eq!(
            clean("Aquí tienes el prompt mejorado: Una foto de un zorro"),
            "Una foto de un zorro"
        );
    }

    #[test]
    fn strips_bare_label() {
        assert_eq!(clean("Prompt: A photo of a fox"), "A photo of a fox");
        assert_eq!(clean("Improved prompt: A photo of a fox"), "A photo of a fox");
    }

    #[test]
    fn strips_enclosing_quotes() {
        assert_eq!(clean("\"A photo of a fox\""), "A photo of a fox");
        assert_eq!(clean("\u{201C}A photo of a fox\u{201D}"), "A photo of a fox");
    }

    #[test]
    fn interior_quotes_are_kept() {
        assert_eq!(
            clean("A sign that reads \"open\" at night"),
            "A sign that reads \"open\" at night"
        );
    }

    #[test]
    fn layered_boilerplate_is_fully_removed() {
        assert_eq!(
            clean("Here is the improved prompt:\n\"Prompt: A photo of a fox\""),
            "A photo of a fox"
        );
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("   \n\n  "), "");
    }

    #[test]
    fn clean_is_idempotent() {
        let fixtures = [
            "Here is the improved prompt:\nA photo of a fox",
            "Sure! Here's the prompt: \"A castle at dusk\"",
            "Prompt: Prompt: nested label",
            "\"\"double quoted\"\"",
            "plain text with: a colon",
            "Voici le prompt : Un château",
            "",
        ];
        for fixture in fixtures {
            let once = clean(fixture);
            let twice = clean(&once);
            assert_eq!(once, twice, "not idempotent for {:?}", fixture);
        }
    }
}
