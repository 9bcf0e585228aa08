use crate::config::Config;
use crate::llm_client::Dispatcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Every feature reaches the model through this dispatcher.
    pub dispatcher: Dispatcher,
    pub config: Config,
}
