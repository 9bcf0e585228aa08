//! Job and course recommendations for a chosen career path.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::advisor::prompts::{
    COURSE_RECOMMENDATION_PROMPT_TEMPLATE, JOB_RECOMMENDATION_PROMPT_TEMPLATE,
    RECOMMENDATION_SYSTEM,
};
use crate::advisor::to_prompt_json;
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, render};
use crate::llm_client::{Dispatcher, JsonObject, PromptPair};

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    /// Whatever profile data the client holds; forwarded to the model as-is.
    #[serde(default)]
    pub user_data: Value,
    /// A path name or a full roadmap option object.
    #[serde(default)]
    pub career_path: Value,
}

pub async fn recommend_jobs(
    dispatcher: &Dispatcher,
    request: &RecommendationRequest,
) -> Result<JsonObject, AppError> {
    let prompts = prompt_pair(JOB_RECOMMENDATION_PROMPT_TEMPLATE, request)?;
    Ok(dispatcher
        .dispatch_json(&prompts)
        .await
        .or_fallback(json!({ "jobs": [] })))
}

pub async fn recommend_courses(
    dispatcher: &Dispatcher,
    request: &RecommendationRequest,
) -> Result<JsonObject, AppError> {
    let prompts = prompt_pair(COURSE_RECOMMENDATION_PROMPT_TEMPLATE, request)?;
    Ok(dispatcher
        .dispatch_json(&prompts)
        .await
        .or_fallback(json!({ "courses": [] })))
}

/// Runs the job and course dispatches side by side and merges them into
/// `{jobs, courses}`. An `error` from either half is carried over.
pub async fn recommend(
    dispatcher: &Dispatcher,
    request: &RecommendationRequest,
) -> Result<JsonObject, AppError> {
    let (jobs, courses) = tokio::join!(
        recommend_jobs(dispatcher, request),
        recommend_courses(dispatcher, request)
    );
    let (mut jobs, mut courses) = (jobs?, courses?);

    let mut merged = JsonObject::new();
    merged.insert("jobs".to_string(), jobs.remove("jobs").unwrap_or_else(|| json!([])));
    merged.insert(
        "courses".to_string(),
        courses.remove("courses").unwrap_or_else(|| json!([])),
    );
    if let Some(error) = jobs.remove("error").or_else(|| courses.remove("error")) {
        merged.insert("error".to_string(), error);
    }
    Ok(merged)
}

fn prompt_pair(template: &str, request: &RecommendationRequest) -> Result<PromptPair, AppError> {
    let career_path = match &request.career_path {
        Value::String(path) => path.clone(),
        Value::Null => "Not chosen yet".to_string(),
        other => to_prompt_json(other, "career path")?,
    };
    Ok(PromptPair::new(
        json_system(RECOMMENDATION_SYSTEM),
        render(
            template,
            &[
                ("user_json", to_prompt_json(&request.user_data, "user data")?.as_str()),
                ("career_path", career_path.as_str()),
            ],
        ),
    ))
}
