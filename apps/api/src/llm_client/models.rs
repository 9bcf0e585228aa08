//! Model priority lists. Order matters: cheapest/fastest first.

/// Models tried for structured JSON generation, in priority order.
pub const JSON_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-lite-preview-02-05:free",
    "google/gemini-2.0-flash-001",
    "google/gemini-pro-1.5",
    "openai/gpt-3.5-turbo",
];

/// Models tried for free-form mentor chat, in priority order.
pub const CHAT_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-lite-preview-02-05:free",
    "mistralai/mistral-7b-instruct:free",
    "google/gemini-2.0-flash-001",
    "openai/gpt-3.5-turbo",
];

/// What the caller needs back from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// JSON-constrained completion (`response_format: json_object`).
    Json,
    /// Free text.
    Text,
}

/// An ordered list of candidate model ids.
#[derive(Debug, Clone)]
pub struct ModelPriorityList {
    models: Vec<String>,
}

impl ModelPriorityList {
    pub fn new<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    pub fn json_default() -> Self {
        Self::new(JSON_MODELS.iter().copied())
    }

    pub fn chat_default() -> Self {
        Self::new(CHAT_MODELS.iter().copied())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
