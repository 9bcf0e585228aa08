// Shared prompt fragments and prompt-building utilities.
// Each feature defines its own instructions in advisor/prompts.rs.
// This file contains cross-cutting fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Free text longer than this (resumes, uploaded documents) is cut before it
/// goes into a prompt.
pub const MAX_DOCUMENT_CHARS: usize = 8_000;

/// Builds a JSON-mode system prompt: persona/task text followed by the JSON rule.
pub fn json_system(instructions: &str) -> String {
    format!("{}\n\n{}", instructions.trim(), JSON_ONLY_INSTRUCTION)
}

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted text is never scanned again, so a value that itself contains
/// `{other}` stays literal. Braces that do not name a known value (JSON
/// examples in templates) are copied through.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match hit {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Cuts `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_system_appends_rule() {
        let system = json_system("  You are a career coach.\n");
        assert!(system.starts_with("You are a career coach."));
        assert!(system.ends_with(JSON_ONLY_INSTRUCTION));
    }

    #[test]
    fn test_render_fills_known_placeholders() {
        let rendered = render(
            "Role: {role}. Return {\"score\": 0} for {role}.",
            &[("role", "Analyst")],
        );
        assert_eq!(rendered, "Role: Analyst. Return {\"score\": 0} for Analyst.");
    }

    #[test]
    fn test_render_does_not_expand_inserted_text() {
        let rendered = render(
            "Goal: {goal}\nResume: {resume}",
            &[("goal", "{resume}"), ("resume", "Python dev")],
        );
        assert_eq!(rendered, "Goal: {resume}\nResume: Python dev");
    }

    #[test]
    fn test_render_leaves_unknown_and_unclosed_braces() {
        assert_eq!(render("{missing} and {open", &[("x", "y")]), "{missing} and {open");
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "héllo wörld";
        assert_eq!(truncate_chars(text, 2), "hé");
        assert_eq!(truncate_chars(text, 7), "héllo w");
    }
}
