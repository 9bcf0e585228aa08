//! Mock interviews: opening question, turn-by-turn interaction and a final
//! review of the transcript.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::advisor::prompts::{
    INTERVIEWER_BASE, INTERVIEW_FEEDBACK_PROMPT_TEMPLATE, INTERVIEW_FEEDBACK_SYSTEM,
    INTERVIEW_INTERACTION_PROMPT_TEMPLATE, INTERVIEW_START_PROMPT_TEMPLATE, PERSONA_FRIENDLY,
    PERSONA_RUTHLESS, PERSONA_SOCRATIC,
};
use crate::advisor::to_prompt_json;
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, render};
use crate::llm_client::{Dispatcher, JsonObject, PromptPair};

/// Interviewer style. Unrecognised names deserialize to `Friendly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Friendly,
    Ruthless,
    Socratic,
}

const PERSONAS: [(Persona, &str); 3] = [
    (Persona::Friendly, PERSONA_FRIENDLY),
    (Persona::Ruthless, PERSONA_RUTHLESS),
    (Persona::Socratic, PERSONA_SOCRATIC),
];

impl Persona {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ruthless" => Persona::Ruthless,
            "socratic" => Persona::Socratic,
            _ => Persona::Friendly,
        }
    }

    pub fn instructions(self) -> &'static str {
        PERSONAS
            .iter()
            .find(|(persona, _)| *persona == self)
            .map(|(_, text)| *text)
            .unwrap_or(PERSONA_FRIENDLY)
    }

    fn system_prompt(self) -> String {
        json_system(&format!("{INTERVIEWER_BASE}\n\n{}", self.instructions()))
    }
}

impl<'de> Deserialize<'de> for Persona {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.map(|n| Persona::parse(&n)).unwrap_or_default())
    }
}

/// One answered question.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StartInterviewRequest {
    pub role: String,
    #[serde(default = "default_focus")]
    pub focus: String,
    #[serde(default)]
    pub persona: Persona,
}

fn default_focus() -> String {
    "general".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRequest {
    pub role: String,
    #[serde(default)]
    pub history: Vec<Exchange>,
    #[serde(default)]
    pub last_question: String,
    pub user_answer: String,
    #[serde(default)]
    pub persona: Persona,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub role: String,
    #[serde(default)]
    pub history: Vec<Exchange>,
}

pub async fn start_interview(
    dispatcher: &Dispatcher,
    request: &StartInterviewRequest,
) -> Result<JsonObject, AppError> {
    let focus = match request.focus.trim() {
        "" => "general",
        focus => focus,
    };
    let prompts = PromptPair::new(
        request.persona.system_prompt(),
        render(
            INTERVIEW_START_PROMPT_TEMPLATE,
            &[("role", request.role.trim()), ("focus", focus)],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "message": "Welcome! Let's begin your interview.",
        "question": "Tell me about yourself."
    })))
}

pub async fn interview_interaction(
    dispatcher: &Dispatcher,
    request: &InteractionRequest,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        request.persona.system_prompt(),
        render(
            INTERVIEW_INTERACTION_PROMPT_TEMPLATE,
            &[
                ("role", request.role.trim()),
                ("history_json", to_prompt_json(&request.history, "interview history")?.as_str()),
                ("last_question", request.last_question.trim()),
                ("user_answer", request.user_answer.trim()),
            ],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "message": "Thank you for your answer.",
        "next_question": "Can you tell me about a challenge you overcame?",
        "style_feedback": {
            "clarity": "N/A",
            "confidence": "N/A",
            "tips": []
        }
    })))
}

pub async fn interview_feedback(
    dispatcher: &Dispatcher,
    request: &FeedbackRequest,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        json_system(INTERVIEW_FEEDBACK_SYSTEM),
        render(
            INTERVIEW_FEEDBACK_PROMPT_TEMPLATE,
            &[
                ("role", request.role.trim()),
                ("transcript", transcript(&request.history).as_str()),
            ],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "score": 0,
        "communication_rating": "N/A",
        "confidence_rating": "N/A",
        "improvement_suggestions": [],
        "ideal_answers": []
    })))
}

/// Numbered Q/A lines, one pair per exchange.
pub fn transcript(history: &[Exchange]) -> String {
    if history.is_empty() {
        return "(no questions were answered)".to_string();
    }
    history
        .iter()
        .enumerate()
        .map(|(i, ex)| format!("Q{n}: {}\nA{n}: {}", ex.question.trim(), ex.answer.trim(), n = i + 1))
        .collect::<Vec<_>>()
        .join("\n\n")
}
