//! Axum route handlers for the advisor API.
//!
//! Handlers validate caller input and delegate to the feature functions.
//! Dispatcher exhaustion still produces a 200 carrying the fallback object.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::advisor::assessment::{
    evaluate_assessment, generate_assessment, generate_assessment_from_document,
    AssessmentRequest, EvaluationRequest, DEFAULT_QUESTIONS,
};
use crate::advisor::career::{generate_insights, generate_roadmap};
use crate::advisor::interview::{
    interview_feedback, interview_interaction, start_interview, FeedbackRequest,
    InteractionRequest, StartInterviewRequest,
};
use crate::advisor::market::{
    job_prep, market_insights, project_guide, JobPrepRequest, MarketInsightsRequest,
    ProjectGuideRequest,
};
use crate::advisor::profile::CareerInput;
use crate::advisor::recommendations::{recommend, RecommendationRequest};
use crate::advisor::resume::{analyze_resume, build_resume, ResumeBuildRequest};
use crate::documents::{extract_document_text, extract_pdf_text, UploadForm};
use crate::errors::AppError;
use crate::llm_client::JsonObject;
use crate::state::AppState;

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Career planning
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-roadmap
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    Json(input): Json<CareerInput>,
) -> Result<Json<JsonObject>, AppError> {
    Ok(Json(generate_roadmap(&state.dispatcher, &input).await?))
}

/// POST /api/generate-insights
pub async fn handle_generate_insights(
    State(state): State<AppState>,
    Json(input): Json<CareerInput>,
) -> Result<Json<JsonObject>, AppError> {
    Ok(Json(generate_insights(&state.dispatcher, &input).await?))
}

/// POST /api/recommendations
///
/// Runs the job and course dispatches concurrently and returns `{jobs, courses}`.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<JsonObject>, AppError> {
    Ok(Json(recommend(&state.dispatcher, &request).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Market and jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/market-insights
pub async fn handle_market_insights(
    State(state): State<AppState>,
    Json(request): Json<MarketInsightsRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.target_role, "target_role")?;
    Ok(Json(market_insights(&state.dispatcher, &request).await?))
}

/// POST /api/job-prep
pub async fn handle_job_prep(
    State(state): State<AppState>,
    Json(request): Json<JobPrepRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.job_title, "job_title")?;
    Ok(Json(job_prep(&state.dispatcher, &request).await?))
}

/// POST /api/project-guide
pub async fn handle_project_guide(
    State(state): State<AppState>,
    Json(request): Json<ProjectGuideRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.title, "title")?;
    Ok(Json(project_guide(&state.dispatcher, &request).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-resume (multipart: `file` PDF, `career_goal`)
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<JsonObject>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_file()?;
    let career_goal = form.field("career_goal").unwrap_or_default().to_string();

    let resume_text = extract_pdf_text(upload).await?;
    Ok(Json(
        analyze_resume(&state.dispatcher, &resume_text, &career_goal).await?,
    ))
}

/// POST /api/build-resume
///
/// Never returns an exhaustion fallback: a locally assembled resume is used instead.
pub async fn handle_build_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeBuildRequest>,
) -> Result<Json<JsonObject>, AppError> {
    Ok(Json(build_resume(&state.dispatcher, &request).await?))
}

// ────────────────────────────────────────────────────────────────────────────
// Assessments
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-assessment
pub async fn handle_generate_assessment(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.topic, "topic")?;
    Ok(Json(generate_assessment(&state.dispatcher, &request).await?))
}

/// POST /api/evaluate-assessment
pub async fn handle_evaluate_assessment(
    State(state): State<AppState>,
    Json(request): Json<EvaluationRequest>,
) -> Result<Json<JsonObject>, AppError> {
    if request.quiz_context.is_empty() {
        return Err(AppError::Validation(
            "quiz_context cannot be empty".to_string(),
        ));
    }
    Ok(Json(evaluate_assessment(&state.dispatcher, &request).await?))
}

/// POST /api/generate-assessment-from-file (multipart: `file` PDF or text, `count`)
pub async fn handle_generate_assessment_from_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<JsonObject>, AppError> {
    let mut form = UploadForm::read(multipart).await?;
    let upload = form.take_file()?;
    let count = match form.field("count") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| AppError::Validation(format!("count must be a positive integer, got '{raw}'")))?,
        None => DEFAULT_QUESTIONS,
    };

    let document_text = extract_document_text(upload).await?;
    Ok(Json(
        generate_assessment_from_document(&state.dispatcher, &document_text, count).await?,
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Mock interview
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/start-interview
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.role, "role")?;
    Ok(Json(start_interview(&state.dispatcher, &request).await?))
}

/// POST /api/interview-interaction
pub async fn handle_interview_interaction(
    State(state): State<AppState>,
    Json(request): Json<InteractionRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.role, "role")?;
    require(&request.user_answer, "user_answer")?;
    Ok(Json(interview_interaction(&state.dispatcher, &request).await?))
}

/// POST /api/interview-feedback
pub async fn handle_interview_feedback(
    State(state): State<AppState>,
    Json(request): Json<FeedbackRequest>,
) -> Result<Json<JsonObject>, AppError> {
    require(&request.role, "role")?;
    Ok(Json(interview_feedback(&state.dispatcher, &request).await?))
}
