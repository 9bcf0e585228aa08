//! History adapter: reconciles the two chat-history shapes clients send.
//!
//! Clients recorded history either as parts-shaped turns
//! (`{"role": "user" | "model", "parts": ["..."]}`) or as unified turns
//! (`{"role": "user" | "assistant", "content": "..."}`). The provider only
//! understands the unified shape. `normalize` converts the former, keeps the
//! latter, and passes anything unrecognised through untouched so a malformed
//! turn never silently disappears from the conversation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// The unified `{role, content}` turn sent to the provider.
///
/// Any other keys the caller attached (`name`, tool metadata) ride along in
/// `extra` and are serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            extra: Map::new(),
        }
    }

    #[cfg(test)]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            extra: Map::new(),
        }
    }
}

/// A parts-shaped turn: the role vocabulary uses `model` for the assistant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartsTurn {
    pub role: String,
    pub parts: Vec<Value>,
}

/// One turn of caller-supplied history, in whichever shape it arrived.
///
/// Variant order matters for deserialization: a turn carrying `parts` is
/// treated as parts-shaped even if it also has `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryTurn {
    Parts(PartsTurn),
    Unified(ChatTurn),
    Raw(Value),
}

impl From<ChatTurn> for HistoryTurn {
    fn from(turn: ChatTurn) -> Self {
        HistoryTurn::Unified(turn)
    }
}

/// Converts every parts-shaped turn to the unified shape.
///
/// Pure and total: preserves order and length, and is a no-op on output it
/// already produced.
pub fn normalize(history: &[HistoryTurn]) -> Vec<HistoryTurn> {
    history.iter().map(normalize_turn).collect()
}

fn normalize_turn(turn: &HistoryTurn) -> HistoryTurn {
    match turn {
        HistoryTurn::Parts(parts_turn) => match map_parts_role(&parts_turn.role) {
            Some(role) => HistoryTurn::Unified(ChatTurn {
                role,
                content: parts_turn.parts.first().map(part_text).unwrap_or_default(),
                extra: Map::new(),
            }),
            // Unknown role: leave it for the provider to judge.
            None => HistoryTurn::Raw(serde_json::json!({
                "role": parts_turn.role,
                "parts": parts_turn.parts,
            })),
        },
        other => other.clone(),
    }
}

fn map_parts_role(role: &str) -> Option<Role> {
    match role {
        "model" | "assistant" => Some(Role::Assistant),
        "user" => Some(Role::User),
        "system" => Some(Role::System),
        _ => None,
    }
}

fn part_text(part: &Value) -> String {
    match part {
        Value::String(s) => s.clone(),
        Value::Object(map) => match map.get("text") {
            Some(Value::String(s)) => s.clone(),
            _ => part.to_string(),
        },
        other => other.to_string(),
    }
}
