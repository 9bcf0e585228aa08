use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{CredentialPool, DEFAULT_BASE_URL};

/// Application configuration loaded from environment variables.
/// Only malformed numeric values are fatal; a missing API key is reported
/// at start-up and every dispatch then returns its fallback.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: CredentialPool,
    pub llm_base_url: String,
    pub candidate_timeout: Duration,
    /// `None` disables the failure log.
    pub failure_log: Option<PathBuf>,
    pub referer: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match lookup("LLM_CANDIDATE_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("LLM_CANDIDATE_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 45,
        };

        let failure_log = match lookup("LLM_FAILURE_LOG") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path.trim())),
            None => Some(PathBuf::from("llm_failures.log")),
        };

        Ok(Config {
            credentials: CredentialPool::from_comma_separated(
                &lookup("OPENROUTER_API_KEY").unwrap_or_default(),
            ),
            llm_base_url: lookup("LLM_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            candidate_timeout: Duration::from_secs(timeout_secs),
            failure_log,
            referer: lookup("APP_REFERER").unwrap_or_else(|| "http://localhost:3000".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
