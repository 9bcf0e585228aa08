use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / and GET /health
/// Returns a simple status object with service version and whether any
/// provider key is configured.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "career-api",
        "llm_configured": !state.config.credentials.is_empty()
    }))
}
