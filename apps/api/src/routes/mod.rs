pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers;
use crate::mentor::handlers as mentor;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_handler))
        .route("/health", get(health::health_handler))
        // Career planning
        .route("/api/generate-roadmap", post(handlers::handle_generate_roadmap))
        .route("/api/generate-insights", post(handlers::handle_generate_insights))
        .route("/api/recommendations", post(handlers::handle_recommendations))
        // Market and jobs
        .route("/api/market-insights", post(handlers::handle_market_insights))
        .route("/api/job-prep", post(handlers::handle_job_prep))
        .route("/api/project-guide", post(handlers::handle_project_guide))
        // Resume
        .route("/api/analyze-resume", post(handlers::handle_analyze_resume))
        .route("/api/build-resume", post(handlers::handle_build_resume))
        // Assessments
        .route("/api/generate-assessment", post(handlers::handle_generate_assessment))
        .route("/api/evaluate-assessment", post(handlers::handle_evaluate_assessment))
        .route(
            "/api/generate-assessment-from-file",
            post(handlers::handle_generate_assessment_from_file),
        )
        // Mock interview
        .route("/api/start-interview", post(handlers::handle_start_interview))
        .route(
            "/api/interview-interaction",
            post(handlers::handle_interview_interaction),
        )
        .route("/api/interview-feedback", post(handlers::handle_interview_feedback))
        // Mentor
        .route("/api/chat", post(mentor::handle_chat))
        .route("/mentor", get(mentor::handle_mentor_ws))
        .with_state(state)
}
