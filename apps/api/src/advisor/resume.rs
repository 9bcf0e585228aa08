//! Resume analysis (ATS review of uploaded text) and resume building.
//!
//! Resume building is the one feature with its own fallback: when dispatch
//! yields nothing usable, a minimal resume is assembled locally from the
//! request fields so the client always has something to render and edit.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::advisor::prompts::{
    RESUME_ANALYSIS_PROMPT_TEMPLATE, RESUME_ANALYSIS_SYSTEM, RESUME_BUILD_PROMPT_TEMPLATE,
    RESUME_BUILD_SYSTEM,
};
use crate::advisor::to_prompt_json;
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, render, truncate_chars, MAX_DOCUMENT_CHARS};
use crate::llm_client::{Dispatcher, JsonDispatch, JsonObject, PromptPair};

/// Skills used by the local fallback when the request lists none.
pub const DEFAULT_SKILLS: [&str; 2] = ["Communication", "Problem Solving"];

const DEFAULT_CAREER_GOAL: &str = "Software Engineer";

/// Scores extracted resume text against a target role.
pub async fn analyze_resume(
    dispatcher: &Dispatcher,
    resume_text: &str,
    career_goal: &str,
) -> Result<JsonObject, AppError> {
    let career_goal = match career_goal.trim() {
        "" => DEFAULT_CAREER_GOAL,
        goal => goal,
    };
    let prompts = PromptPair::new(
        json_system(RESUME_ANALYSIS_SYSTEM),
        render(
            RESUME_ANALYSIS_PROMPT_TEMPLATE,
            &[
                ("career_goal", career_goal),
                ("resume_text", truncate_chars(resume_text.trim(), MAX_DOCUMENT_CHARS)),
            ],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "ats_score": 0,
        "skills_found": [],
        "missing_keywords": [],
        "improvements": []
    })))
}

/// Raw resume details typed by the user. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeBuildRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub target_role: String,
    pub education: String,
    pub experience: String,
    pub projects: String,
    /// Comma-separated, e.g. "Python, SQL".
    pub skills: String,
}

pub async fn build_resume(
    dispatcher: &Dispatcher,
    request: &ResumeBuildRequest,
) -> Result<JsonObject, AppError> {
    let mut details = request.clone();
    details.experience = truncate_chars(&request.experience, MAX_DOCUMENT_CHARS).to_string();
    details.projects = truncate_chars(&request.projects, MAX_DOCUMENT_CHARS).to_string();

    let prompts = PromptPair::new(
        json_system(RESUME_BUILD_SYSTEM),
        render(
            RESUME_BUILD_PROMPT_TEMPLATE,
            &[("resume_input_json", to_prompt_json(&details, "resume details")?.as_str())],
        ),
    );

    match dispatcher.dispatch_json(&prompts).await {
        JsonDispatch::Parsed(resume) if is_usable(&resume) => Ok(resume),
        _ => {
            info!("Resume build produced no usable result, assembling locally");
            Ok(local_resume(request))
        }
    }
}

fn is_usable(resume: &JsonObject) -> bool {
    !resume.is_empty() && !resume.contains_key("error")
}

/// Deterministic minimal resume built from the request fields alone.
pub fn local_resume(request: &ResumeBuildRequest) -> JsonObject {
    let skills = split_skills(&request.skills);
    let role = non_blank(&request.target_role).unwrap_or("professional");
    let name = non_blank(&request.name).unwrap_or("Candidate");

    let summary = format!(
        "{name} is a motivated {role} with strengths in {}, eager to contribute to a forward-thinking team.",
        skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    );

    let experience = json!({
        "title": non_blank(&request.target_role).unwrap_or("Professional Experience"),
        "company": "Company Name",
        "duration": "Dates",
        "bullets": [
            non_blank(&request.experience)
                .unwrap_or("Describe your key responsibilities and measurable achievements.")
        ]
    });

    let education = json!({
        "degree": non_blank(&request.education).unwrap_or("Degree"),
        "institution": "Institution Name",
        "year": ""
    });

    let mut resume = JsonObject::new();
    resume.insert("summary".to_string(), Value::String(summary));
    resume.insert("experience".to_string(), json!([experience]));
    resume.insert("education".to_string(), json!([education]));
    resume.insert("skills".to_string(), json!(skills));
    resume.insert("projects".to_string(), json!([]));
    resume
}

/// Splits a comma-separated skills field, trimming and dropping blanks.
/// Falls back to `DEFAULT_SKILLS` when nothing remains.
pub fn split_skills(raw: &str) -> Vec<String> {
    let skills: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    if skills.is_empty() {
        DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
    } else {
        skills
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{fail, ok, single_candidate, ScriptedProvider};

    #[test]
    fn test_split_skills_trims() {
        assert_eq!(split_skills("Python, SQL"), vec!["Python", "SQL"]);
        assert_eq!(split_skills(" Rust ,, Go ,"), vec!["Rust", "Go"]);
    }

    #[test]
    fn test_split_skills_default_when_absent() {
        assert_eq!(split_skills(""), vec!["Communication", "Problem Solving"]);
        assert_eq!(split_skills(" , "), vec!["Communication", "Problem Solving"]);
    }

    #[test]
    fn test_local_resume_uses_education_field() {
        let request = ResumeBuildRequest {
            name: "Ravi".to_string(),
            education: "B.Tech Computer Science".to_string(),
            skills: "Python, SQL".to_string(),
            ..Default::default()
        };
        let resume = local_resume(&request);
        assert_eq!(resume["education"][0]["degree"], "B.Tech Computer Science");
        assert_eq!(resume["experience"].as_array().unwrap().len(), 1);
        assert_eq!(resume["education"].as_array().unwrap().len(), 1);
        assert!(resume["summary"].as_str().unwrap().starts_with("Ravi"));
    }

    #[test]
    fn test_local_resume_placeholder_education() {
        let resume = local_resume(&ResumeBuildRequest::default());
        assert_eq!(resume["education"][0]["degree"], "Degree");
        assert_eq!(resume["skills"], json!(["Communication", "Problem Solving"]));
    }

    #[tokio::test]
    async fn test_build_resume_falls_back_on_exhaustion() {
        let dispatcher = single_candidate(ScriptedProvider::new([fail("down")]));
        let request = ResumeBuildRequest {
            skills: "Python, SQL".to_string(),
            ..Default::default()
        };

        let resume = build_resume(&dispatcher, &request).await.unwrap();

        assert_eq!(resume["skills"], json!(["Python", "SQL"]));
        assert!(!resume.contains_key("error"));
    }

    #[tokio::test]
    async fn test_build_resume_falls_back_on_error_payload() {
        let provider = ScriptedProvider::new([ok(r#"{"error": "cannot comply"}"#)]);
        let dispatcher = single_candidate(provider);

        let resume = build_resume(&dispatcher, &ResumeBuildRequest::default()).await.unwrap();

        assert_eq!(resume["skills"], json!(["Communication", "Problem Solving"]));
    }

    #[tokio::test]
    async fn test_build_resume_falls_back_on_empty_object() {
        let dispatcher = single_candidate(ScriptedProvider::new([ok("{}")]));

        let resume = build_resume(&dispatcher, &ResumeBuildRequest::default()).await.unwrap();

        assert!(resume.contains_key("summary"));
    }

    #[tokio::test]
    async fn test_build_resume_keeps_model_result() {
        let provider = ScriptedProvider::new([ok(r#"{"summary": "Seasoned engineer", "skills": ["Go"]}"#)]);
        let dispatcher = single_candidate(provider);

        let resume = build_resume(&dispatcher, &ResumeBuildRequest::default()).await.unwrap();

        assert_eq!(resume["summary"], "Seasoned engineer");
        assert_eq!(resume["skills"], json!(["Go"]));
    }

    #[tokio::test]
    async fn test_analysis_truncates_long_resume() {
        let provider = ScriptedProvider::new([ok(r#"{"ats_score": 50}"#)]);
        let dispatcher = single_candidate(provider.clone());
        let resume_text = "a".repeat(MAX_DOCUMENT_CHARS + 500);

        let analysis = analyze_resume(&dispatcher, &resume_text, "").await.unwrap();

        assert_eq!(analysis["ats_score"], 50);
        let user = provider.user_prompt(0);
        assert!(user.contains("\"Software Engineer\""));
        assert_eq!(user.matches('a').count() - count_template_a(), MAX_DOCUMENT_CHARS);
    }

    fn count_template_a() -> usize {
        render(
            RESUME_ANALYSIS_PROMPT_TEMPLATE,
            &[("career_goal", DEFAULT_CAREER_GOAL), ("resume_text", "")],
        )
        .matches('a')
        .count()
    }

    #[tokio::test]
    async fn test_career_goal_braces_are_not_expanded() {
        let provider = ScriptedProvider::new([ok(r#"{"ats_score": 61}"#)]);
        let dispatcher = single_candidate(provider.clone());

        analyze_resume(&dispatcher, "Built ETL jobs in Airflow", "{resume_text}")
            .await
            .unwrap();

        let user = provider.user_prompt(0);
        assert!(user.contains(r#"target role "{resume_text}""#));
        assert_eq!(user.matches("Built ETL jobs in Airflow").count(), 1);
    }
}
