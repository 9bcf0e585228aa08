mod advisor;
mod config;
mod documents;
mod errors;
mod llm_client;
mod mentor;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::failure_log::FailureLog;
use crate::llm_client::{Dispatcher, LlmClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails only on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career API v{}", env!("CARGO_PKG_VERSION"));

    if config.credentials.is_empty() {
        warn!("OPENROUTER_API_KEY is not set: every AI feature will return its fallback");
    } else {
        info!("Loaded {} provider key(s)", config.credentials.len());
    }

    // Initialize LLM client and dispatcher
    let llm = LlmClient::new(config.llm_base_url.clone(), config.referer.clone());
    let failure_log = match &config.failure_log {
        Some(path) => FailureLog::at(path.clone()),
        None => FailureLog::disabled(),
    };
    let dispatcher = Dispatcher::new(Arc::new(llm), config.credentials.clone())
        .with_failure_log(failure_log)
        .with_candidate_timeout(config.candidate_timeout);
    info!(
        "Dispatcher ready (endpoint: {}, candidate timeout: {:?})",
        config.llm_base_url, config.candidate_timeout
    );

    let state = AppState {
        dispatcher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
