//! Response sanitizer: removes the markdown decoration models wrap around JSON.
//!
//! Best-effort text cleanup only. `serde_json` is the real correctness gate.

const FENCE: &str = "```";

/// Strips every ```` ``` ```` fence (plus a language tag directly after it,
/// e.g. ```` ```json ````) and trims. Text without fences is only trimmed.
///
/// Idempotent: the output never contains a fence.
pub fn extract_json(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    // Removing one fence can join stray backticks into a new one.
    while text.contains(FENCE) {
        text = strip_fences_once(&text);
    }
    text.trim().to_string()
}

fn strip_fences_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(idx) = rest.find(FENCE) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx + FENCE.len()..];
        let tag_len = rest
            .find(|c: char| !is_tag_char(c))
            .unwrap_or(rest.len());
        rest = &rest[tag_len..];
    }
    out.push_str(rest);
    out
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')
}

/// The span from the first `{` to the last `}`, if any. Used as a repair step
/// when a model puts prose around an otherwise valid object.
pub fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}
