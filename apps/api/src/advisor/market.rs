//! Market readiness, per-job preparation and portfolio project guides.

use serde::Deserialize;
use serde_json::json;

use crate::advisor::prompts::{
    JOB_PREP_PROMPT_TEMPLATE, MARKET_INSIGHTS_PROMPT_TEMPLATE, MARKET_SYSTEM,
    PROJECT_GUIDE_PROMPT_TEMPLATE,
};
use crate::advisor::join_list;
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, render};
use crate::llm_client::{Dispatcher, JsonObject, PromptPair};

#[derive(Debug, Clone, Deserialize)]
pub struct MarketInsightsRequest {
    pub target_role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobPrepRequest {
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectGuideRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub async fn market_insights(
    dispatcher: &Dispatcher,
    request: &MarketInsightsRequest,
) -> Result<JsonObject, AppError> {
    let location = if request.location.trim().is_empty() {
        "Anywhere"
    } else {
        request.location.trim()
    };
    let prompts = PromptPair::new(
        json_system(MARKET_SYSTEM),
        render(
            MARKET_INSIGHTS_PROMPT_TEMPLATE,
            &[
                ("target_role", request.target_role.trim()),
                ("skills", join_list(&request.skills).as_str()),
                ("location", location),
            ],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "readiness_score": 0,
        "hiring_probability": "Unknown",
        "analysis_summary": "",
        "critical_missing_skills": [],
        "recommended_jobs": []
    })))
}

pub async fn job_prep(
    dispatcher: &Dispatcher,
    request: &JobPrepRequest,
) -> Result<JsonObject, AppError> {
    let company = if request.company.trim().is_empty() {
        "an unnamed company"
    } else {
        request.company.trim()
    };
    let prompts = PromptPair::new(
        json_system(MARKET_SYSTEM),
        render(
            JOB_PREP_PROMPT_TEMPLATE,
            &[
                ("job_title", request.job_title.trim()),
                ("company", company),
                ("skills", join_list(&request.skills).as_str()),
            ],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "match_summary": "",
        "interview_questions": [],
        "resume_keywords": [],
        "project_challenge": null
    })))
}

pub async fn project_guide(
    dispatcher: &Dispatcher,
    request: &ProjectGuideRequest,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        json_system(MARKET_SYSTEM),
        render(
            PROJECT_GUIDE_PROMPT_TEMPLATE,
            &[
                ("title", request.title.trim()),
                ("description", request.description.trim()),
            ],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "tech_stack": [],
        "steps": [],
        "bonus_challenge": ""
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{fail, ok, single_candidate, ScriptedProvider};
    use serde_json::Value;

    #[tokio::test]
    async fn test_market_prompt_lists_skills_and_location() {
        let provider = ScriptedProvider::new([ok(r#"{"readiness_score": 70}"#)]);
        let dispatcher = single_candidate(provider.clone());
        let request = MarketInsightsRequest {
            target_role: "Backend Engineer".to_string(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            location: "Pune".to_string(),
        };

        let result = market_insights(&dispatcher, &request).await.unwrap();

        assert_eq!(result["readiness_score"], 70);
        let user = provider.user_prompt(0);
        assert!(user.contains("TARGET ROLE: Backend Engineer"));
        assert!(user.contains("CURRENT SKILLS: Rust, SQL"));
        assert!(user.contains("LOCATION: Pune"));
    }

    #[tokio::test]
    async fn test_market_blank_location_defaults() {
        let provider = ScriptedProvider::new([ok("{}")]);
        let dispatcher = single_candidate(provider.clone());
        let request = MarketInsightsRequest {
            target_role: "Analyst".to_string(),
            skills: vec![],
            location: "  ".to_string(),
        };

        market_insights(&dispatcher, &request).await.unwrap();

        let user = provider.user_prompt(0);
        assert!(user.contains("LOCATION: Anywhere"));
        assert!(user.contains("CURRENT SKILLS: None listed"));
    }

    #[tokio::test]
    async fn test_job_prep_fallback_has_null_project() {
        let dispatcher = single_candidate(ScriptedProvider::new([fail("down")]));
        let request = JobPrepRequest {
            job_title: "SRE".to_string(),
            company: "Acme".to_string(),
            skills: vec![],
        };

        let result = job_prep(&dispatcher, &request).await.unwrap();

        assert_eq!(result["project_challenge"], Value::Null);
        assert!(result["interview_questions"].is_array());
        assert!(result.contains_key("error"));
    }

    #[tokio::test]
    async fn test_project_guide_passes_through_model_output() {
        let provider = ScriptedProvider::new([ok(
            r#"{"tech_stack": ["Rust"], "steps": [{"step": 1, "title": "Init"}], "bonus_challenge": "Add CI"}"#,
        )]);
        let dispatcher = single_candidate(provider);
        let request = ProjectGuideRequest {
            title: "CLI todo".to_string(),
            description: "A todo app".to_string(),
        };

        let result = project_guide(&dispatcher, &request).await.unwrap();

        assert_eq!(result["bonus_challenge"], "Add CI");
        assert!(!result.contains_key("error"));
    }
}
