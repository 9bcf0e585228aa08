//! Per-connection learner context for the mentor stream.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the mentor knows about the learner on one WebSocket connection.
/// Owned by the connection loop; never shared between connections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserContext {
    pub education: String,
    /// Free-form: a percentage, a GPA or a grade string.
    pub marks: Value,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub career_goal: Option<String>,
    pub language: String,
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            education: "Not set".to_string(),
            marks: Value::Null,
            interests: Vec::new(),
            skills: Vec::new(),
            career_goal: None,
            language: "en".to_string(),
        }
    }
}

/// Partial update sent by the client. Absent fields leave the context as is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContextUpdate {
    pub education: Option<String>,
    pub marks: Option<Value>,
    pub interests: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub career_goal: Option<String>,
    pub language: Option<String>,
}

impl UserContext {
    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(education) = update.education {
            self.education = education;
        }
        if let Some(marks) = update.marks {
            self.marks = marks;
        }
        if let Some(interests) = update.interests {
            self.interests = interests;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(goal) = update.career_goal {
            self.career_goal = Some(goal).filter(|g| !g.trim().is_empty());
        }
        if let Some(language) = update.language.filter(|l| !l.trim().is_empty()) {
            self.language = language;
        }
    }
}
