//! Career roadmap options and profile insights.

use serde_json::json;

use crate::advisor::profile::CareerInput;
use crate::advisor::prompts::{
    INSIGHTS_PROMPT_TEMPLATE, INSIGHTS_SYSTEM, ROADMAP_PROMPT_TEMPLATE, ROADMAP_SYSTEM,
};
use crate::advisor::to_prompt_json;
use crate::errors::AppError;
use crate::llm_client::prompts::{json_system, render};
use crate::llm_client::{Dispatcher, JsonObject, PromptPair};

/// Generates three roadmap options (`options[]`, each with four phases).
pub async fn generate_roadmap(
    dispatcher: &Dispatcher,
    input: &CareerInput,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        json_system(ROADMAP_SYSTEM),
        render(
            ROADMAP_PROMPT_TEMPLATE,
            &[("profile_json", to_prompt_json(input, "profile")?.as_str())],
        ),
    );
    Ok(dispatcher
        .dispatch_json(&prompts)
        .await
        .or_fallback(json!({ "options": [] })))
}

/// Strengths, weaknesses, suggestions and a market-readiness label.
pub async fn generate_insights(
    dispatcher: &Dispatcher,
    input: &CareerInput,
) -> Result<JsonObject, AppError> {
    let prompts = PromptPair::new(
        json_system(INSIGHTS_SYSTEM),
        render(
            INSIGHTS_PROMPT_TEMPLATE,
            &[("profile_json", to_prompt_json(input, "profile")?.as_str())],
        ),
    );
    Ok(dispatcher.dispatch_json(&prompts).await.or_fallback(json!({
        "strengths": [],
        "weaknesses": [],
        "suggestions": [],
        "market_readiness": "Unknown"
    })))
}
