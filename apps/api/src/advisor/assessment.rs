//! Skill assessments: quiz generation (from a topic or an uploaded document)
//! and evaluation of submitted answers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::advisor::prompts::{
    ASSESSMENT_EVALUATION_PROMPT_TEMPLATE, ASSESSMENT_FROM_DOCUMENT_PROMPT_TEMPLATE,
    ASSESSMENT_PROMPT_TEMPLATE, ASSESSMENT_SYSTEM,
};
use crate::advisor::to_prompt_json;
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, render, truncate_chars, MAX_DOCUMENT_CHARS};
use crate::llm_client::{Dispatcher, JsonDispatch, JsonObject, PromptPair};

pub const MAX_QUESTIONS: u32 = 20;
pub const DEFAULT_QUESTIONS: u32 = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    pub topic: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_difficulty() -> String {
    "Intermediate".to_string()
}

fn default_count() -> u32 {
    DEFAULT_QUESTIONS
}

/// Question count clamped to `1..=MAX_QUESTIONS`.
pub fn clamp_count(count: u32) -> u32 {
    count.clamp(1, MAX_QUESTIONS)
}

pub async fn generate_assessment(
    dispatcher: &Dispatcher,
    request: &AssessmentRequest,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        json_system(ASSESSMENT_SYSTEM),
        render(
            ASSESSMENT_PROMPT_TEMPLATE,
            &[
                ("count", clamp_count(request.count).to_string().as_str()),
                ("difficulty", request.difficulty.trim()),
                ("topic", request.topic.trim()),
            ],
        ),
    );
    Ok(dispatcher
        .dispatch_json(&prompts)
        .await
        .or_fallback(json!({ "questions": [] })))
}

/// Quiz grounded in extracted document text (truncated to the prompt limit).
pub async fn generate_assessment_from_document(
    dispatcher: &Dispatcher,
    document_text: &str,
    count: u32,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        json_system(ASSESSMENT_SYSTEM),
        render(
            ASSESSMENT_FROM_DOCUMENT_PROMPT_TEMPLATE,
            &[
                ("count", clamp_count(count).to_string().as_str()),
                (
                    "document_text",
                    truncate_chars(document_text.trim(), MAX_DOCUMENT_CHARS),
                ),
            ],
        ),
    );
    Ok(dispatcher
        .dispatch_json(&prompts)
        .await
        .or_fallback(json!({ "questions": [] })))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: i64,
    pub selected_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub user_answers: Vec<UserAnswer>,
    /// The questions as generated, including `id` and `correct_index`.
    #[serde(default)]
    pub quiz_context: Vec<Value>,
}

/// Locally computed grade. The model only writes the commentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub correct: usize,
    pub total: usize,
}

impl Grade {
    /// Percentage, rounded to the nearest integer. 0 for an empty quiz.
    pub fn score(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as u32
    }
}

pub fn grade(request: &EvaluationRequest) -> Grade {
    let correct = request
        .quiz_context
        .iter()
        .filter(|question| {
            let (Some(id), Some(expected)) = (
                question.get("id").and_then(Value::as_i64),
                question.get("correct_index").and_then(Value::as_i64),
            ) else {
                return false;
            };
            request
                .user_answers
                .iter()
                .any(|a| a.question_id == id && a.selected_index == expected)
        })
        .count();
    Grade {
        correct,
        total: request.quiz_context.len(),
    }
}

pub async fn evaluate_assessment(
    dispatcher: &Dispatcher,
    request: &EvaluationRequest,
) -> Result<JsonObject, AppError> {
    let grade = grade(request);
    let score = grade.score();

    let answered: Vec<Value> = request
        .quiz_context
        .iter()
        .map(|question| {
            let id = question.get("id").and_then(Value::as_i64);
            let selected = request
                .user_answers
                .iter()
                .find(|a| Some(a.question_id) == id)
                .map(|a| a.selected_index);
            json!({
                "question": question.get("question"),
                "options": question.get("options"),
                "correct_index": question.get("correct_index"),
                "selected_index": selected,
            })
        })
        .collect();

    let topic = match request.topic.trim() {
        "" => "general knowledge",
        topic => topic,
    };
    let prompts = PromptPair::new(
        json_system(ASSESSMENT_SYSTEM),
        render(
            ASSESSMENT_EVALUATION_PROMPT_TEMPLATE,
            &[
                ("topic", topic),
                ("correct", grade.correct.to_string().as_str()),
                ("total", grade.total.to_string().as_str()),
                ("score", score.to_string().as_str()),
                ("answers_json", to_prompt_json(&answered, "answers")?.as_str()),
            ],
        ),
    );

    let mut result = match dispatcher.dispatch_json(&prompts).await {
        JsonDispatch::Parsed(obj) => obj,
        exhausted => exhausted.or_fallback(json!({
            "summary": format!(
                "You answered {} of {} questions correctly.",
                grade.correct, grade.total
            ),
            "weak_areas": [],
            "recommendations": []
        })),
    };
    result.insert("score".to_string(), json!(score));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{fail, ok, single_candidate, ScriptedProvider};

    fn evaluation(answers: &[(i64, i64)]) -> EvaluationRequest {
        EvaluationRequest {
            topic: "Python".to_string(),
            user_answers: answers
                .iter()
                .map(|&(question_id, selected_index)| UserAnswer {
                    question_id,
                    selected_index,
                })
                .collect(),
            quiz_context: vec![
                json!({"id": 1, "question": "Q1", "options": ["a", "b"], "correct_index": 0}),
                json!({"id": 2, "question": "Q2", "options": ["a", "b"], "correct_index": 1}),
                json!({"id": 3, "question": "Q3", "options": ["a", "b"], "correct_index": 1}),
            ],
        }
    }

    #[test]
    fn test_grade_counts_matching_answers() {
        let g = grade(&evaluation(&[(1, 0), (2, 0), (3, 1)]));
        assert_eq!(g, Grade { correct: 2, total: 3 });
        assert_eq!(g.score(), 67);
    }

    #[test]
    fn test_unanswered_questions_are_wrong() {
        let g = grade(&evaluation(&[]));
        assert_eq!(g.correct, 0);
        assert_eq!(g.score(), 0);
    }

    #[test]
    fn test_empty_quiz_scores_zero() {
        let request = EvaluationRequest {
            topic: String::new(),
            user_answers: vec![],
            quiz_context: vec![],
        };
        assert_eq!(grade(&request).score(), 0);
    }

    #[test]
    fn test_count_is_clamped() {
        assert_eq!(clamp_count(0), 1);
        assert_eq!(clamp_count(7), 7);
        assert_eq!(clamp_count(500), MAX_QUESTIONS);
    }

    #[test]
    fn test_request_defaults() {
        let request: AssessmentRequest = serde_json::from_value(json!({"topic": "SQL"})).unwrap();
        assert_eq!(request.difficulty, "Intermediate");
        assert_eq!(request.count, DEFAULT_QUESTIONS);
    }

    #[tokio::test]
    async fn test_generate_prompt_uses_clamped_count() {
        let provider = ScriptedProvider::new([ok(r#"{"questions": []}"#)]);
        let dispatcher = single_candidate(provider.clone());
        let request = AssessmentRequest {
            topic: "Rust".to_string(),
            difficulty: "Beginner".to_string(),
            count: 99,
        };

        generate_assessment(&dispatcher, &request).await.unwrap();

        assert!(provider
            .user_prompt(0)
            .starts_with("Write 20 Beginner-level multiple-choice questions on \"Rust\""));
    }

    #[tokio::test]
    async fn test_document_quiz_includes_material() {
        let provider = ScriptedProvider::new([ok(r#"{"questions": [{"id": 1}]}"#)]);
        let dispatcher = single_candidate(provider.clone());

        let quiz = generate_assessment_from_document(&dispatcher, "Ownership moves values.", 3)
            .await
            .unwrap();

        assert_eq!(quiz["questions"][0]["id"], 1);
        assert!(provider.user_prompt(0).contains("MATERIAL:\nOwnership moves values."));
    }

    #[tokio::test]
    async fn test_evaluation_score_is_local_even_if_model_disagrees() {
        let provider = ScriptedProvider::new([ok(
            r#"{"score": 100, "summary": "Great", "weak_areas": [], "recommendations": []}"#,
        )]);
        let dispatcher = single_candidate(provider.clone());

        let result = evaluate_assessment(&dispatcher, &evaluation(&[(1, 0)]))
            .await
            .unwrap();

        assert_eq!(result["score"], 33);
        assert_eq!(result["summary"], "Great");
        assert!(provider.user_prompt(0).contains("answered 1 of 3"));
    }

    #[tokio::test]
    async fn test_evaluation_fallback_keeps_local_score() {
        let dispatcher = single_candidate(ScriptedProvider::new([fail("down")]));

        let result = evaluate_assessment(&dispatcher, &evaluation(&[(1, 0), (2, 1), (3, 1)]))
            .await
            .unwrap();

        assert_eq!(result["score"], 100);
        assert_eq!(result["summary"], "You answered 3 of 3 questions correctly.");
        assert!(result.contains_key("error"));
    }
}
