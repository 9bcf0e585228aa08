// Career advisor features.
// Each feature renders a prompt pair, runs one JSON dispatch and reshapes the
// result. All model calls go through llm_client::Dispatcher.

pub mod assessment;
pub mod career;
pub mod handlers;
pub mod interview;
pub mod market;
pub mod profile;
pub mod prompts;
pub mod recommendations;
pub mod resume;

use serde::Serialize;

use crate::errors::AppError;

/// Pretty JSON for embedding request data in a prompt.
pub(crate) fn to_prompt_json<T: Serialize + ?Sized>(
    value: &T,
    what: &str,
) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Generation(format!("Failed to serialize {what}: {e}")))
}

/// Comma-joined list for inline prompt fields, skipping blank entries.
pub(crate) fn join_list(items: &[String]) -> String {
    let joined = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        "None listed".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(&[]), "None listed");
        assert_eq!(join_list(&[" ".to_string()]), "None listed");
        assert_eq!(
            join_list(&["Rust ".to_string(), "".to_string(), "SQL".to_string()]),
            "Rust, SQL"
        );
    }

    #[test]
    fn test_to_prompt_json_is_pretty() {
        let rendered = to_prompt_json(&serde_json::json!({"a": 1}), "test").unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }
}
