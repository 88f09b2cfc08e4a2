//! Parsing of categorized keyword suggestions
//!
//! The suggest instruction asks the model for one line per category in the
//! shape `<category>: <keyword>; <keyword>; ...`. Models mostly comply but
//! decorate freely (bullets, bold markers, trailing periods), so parsing is
//! tolerant: malformed lines are skipped, and a completely unparseable
//! response yields an empty set rather than an error.

use crate::api::SuggestionCategory;

/// Parse raw model output into ordered suggestion categories.
pub fn parse_suggestions(raw: &str) -> Vec<SuggestionCategory> {
    raw.lines()
        .filter_map(|line| {
            let line = line.trim().trim_start_matches(['-', '*', '•']).trim();
            let (category, rest) = line.split_once(':')?;

            let category = category.trim().trim_matches('*').trim();
            if category.is_empty() {
                return None;
            }

            let suggestions: Vec<String> = rest
                .split([';', ','])
                .map(|item| item.trim().trim_matches('"').trim_end_matches('.').to_string())
                .filter(|item| !item.is_empty())
                .collect();

            if suggestions.is_empty() {
                return None;
            }

            Some(SuggestionCategory {
                category: category.to_string(),
                suggestions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_expected_shape() {
        let raw = "Style: cinematic; moody; vibrant\nSubject: portrait; landscape; macro";
        let categories = parse_suggestions(raw);

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Style");
        assert_eq!(categories[0].suggestions, vec!["cinematic", "moody", "vibrant"]);
        assert_eq!(categories[1].category, "Subject");
        assert_eq!(categories[1].suggestions.len(), 3);
    }

    #[test]
    fn order_is_preserved() {
        let raw = "Zeta: a; b\nAlpha: c; d";
        let categories = parse_suggestions(raw);
        assert_eq!(categories[0].category, "Zeta");
        assert_eq!(categories[1].category, "Alpha");
    }

    #[test]
    fn tolerates_bullets_bold_and_commas() {
        let raw = "- **Lighting**: golden hour, backlit, neon\n* Mood: serene; eerie.";
        let categories = parse_suggestions(raw);

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "Lighting");
        assert_eq!(categories[0].suggestions, vec!["golden hour", "backlit", "neon"]);
        assert_eq!(categories[1].suggestions, vec!["serene", "eerie"]);
    }

    #[test]
    fn skips_malformed_lines() {
        let raw = "just prose without a separator\nColors: red; blue\n: no category\nEmpty:";
        let categories = parse_suggestions(raw);

        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].category, "Colors");
    }

    #[test]
    fn unparseable_output_yields_empty_set() {
        assert!(parse_suggestions("I cannot help with that.").is_empty());
        assert!(parse_suggestions("").is_empty());
    }
}
