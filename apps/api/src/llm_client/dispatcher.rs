//! Fallback dispatcher: every feature's LLM call funnels through here.
//!
//! For one logical request the dispatcher walks the credential pool (outer
//! loop) and the capability's model priority list (inner loop), making exactly
//! one bounded attempt per (credential, model) pair. The first attempt whose
//! output is acceptable wins and nothing after it is tried. A failed attempt is
//! recorded and skipped, never retried. When every pair has failed the caller
//! still gets a value of the shape it expects: a terminal fallback object for
//! JSON calls, a fixed apology for chat.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::llm_client::failure_log::{FailureLog, FailureRecord};
use crate::llm_client::history::{normalize, ChatTurn, HistoryTurn};
use crate::llm_client::sanitizer::{extract_json, outermost_object};
use crate::llm_client::{
    ChatProvider, CompletionRequest, Credential, CredentialPool, LlmError, ModelPriorityList,
    ResponseMode,
};

/// A structured dispatch result: string keys to arbitrary JSON.
pub type JsonObject = Map<String, Value>;

/// Reply text returned by chat dispatch when every candidate failed.
/// Clients treat this exact string as the chat failure signal.
pub const CHAT_APOLOGY: &str = "I'm having trouble thinking right now. Please try again.";

pub const DEFAULT_CANDIDATE_TIMEOUT: Duration = Duration::from_secs(45);

/// The system instruction and user payload for one JSON dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Why a single candidate was rejected. Routine, never surfaced to callers.
#[derive(Debug, Error)]
pub enum CandidateFailure {
    #[error(transparent)]
    Provider(#[from] LlmError),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("response is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("response JSON is not an object")]
    NotAnObject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustionReason {
    /// Empty credential pool: nothing was attempted.
    NoCredentials,
    /// Empty model list for the capability: nothing was attempted.
    NoModels,
    AllCandidatesFailed,
}

/// Every candidate of a dispatch failed (or none could be tried).
#[derive(Debug)]
pub struct Exhaustion {
    pub reason: ExhaustionReason,
    pub failures: Vec<FailureRecord>,
}

impl Exhaustion {
    pub fn attempts(&self) -> usize {
        self.failures.len()
    }

    /// User-facing text placed in the terminal fallback's `error` field.
    pub fn message(&self) -> &'static str {
        match self.reason {
            ExhaustionReason::NoCredentials => {
                "AI service is not configured: no provider API key is available."
            }
            ExhaustionReason::NoModels | ExhaustionReason::AllCandidatesFailed => {
                "All AI models are currently unavailable. Please try again later."
            }
        }
    }
}

/// Outcome of `Dispatcher::dispatch_json`.
#[derive(Debug)]
pub enum JsonDispatch {
    Parsed(JsonObject),
    Exhausted(Exhaustion),
}

impl JsonDispatch {
    /// The parsed object, or the terminal fallback built from `defaults`.
    pub fn or_fallback(self, defaults: Value) -> JsonObject {
        match self {
            JsonDispatch::Parsed(obj) => obj,
            JsonDispatch::Exhausted(exhaustion) => {
                debug!(
                    "Serving terminal fallback after {} failed attempt(s)",
                    exhaustion.attempts()
                );
                terminal_fallback(exhaustion.message(), defaults)
            }
        }
    }
}

/// Outcome of `Dispatcher::dispatch_chat`.
#[derive(Debug)]
pub enum ChatDispatch {
    Replied(String),
    Exhausted(Exhaustion),
}

impl ChatDispatch {
    /// The reply, or `CHAT_APOLOGY`.
    pub fn into_text(self) -> String {
        match self {
            ChatDispatch::Replied(text) => text,
            ChatDispatch::Exhausted(exhaustion) => {
                debug!(
                    "Serving chat apology after {} failed attempt(s)",
                    exhaustion.attempts()
                );
                CHAT_APOLOGY.to_string()
            }
        }
    }
}

/// `defaults` (an object; anything else counts as `{}`) plus an `error` field.
pub fn terminal_fallback(message: &str, defaults: Value) -> JsonObject {
    let mut obj = match defaults {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    obj.insert("error".to_string(), Value::String(message.to_string()));
    obj
}

/// Walks credentials × models for each request. Read-only after start-up and
/// cheap to clone; the only side effect is appending to the failure log.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn ChatProvider>,
    credentials: CredentialPool,
    json_models: ModelPriorityList,
    chat_models: ModelPriorityList,
    failure_log: FailureLog,
    candidate_timeout: Duration,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn ChatProvider>, credentials: CredentialPool) -> Self {
        Self {
            provider,
            credentials,
            json_models: ModelPriorityList::json_default(),
            chat_models: ModelPriorityList::chat_default(),
            failure_log: FailureLog::disabled(),
            candidate_timeout: DEFAULT_CANDIDATE_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_models(mut self, json_models: ModelPriorityList, chat_models: ModelPriorityList) -> Self {
        self.json_models = json_models;
        self.chat_models = chat_models;
        self
    }

    pub fn with_failure_log(mut self, failure_log: FailureLog) -> Self {
        self.failure_log = failure_log;
        self
    }

    pub fn with_candidate_timeout(mut self, timeout: Duration) -> Self {
        self.candidate_timeout = timeout;
        self
    }

    /// Sends `prompts` as system + user messages in JSON mode and returns the
    /// first response that sanitizes and parses into a JSON object.
    pub async fn dispatch_json(&self, prompts: &PromptPair) -> JsonDispatch {
        let messages = [
            HistoryTurn::from(ChatTurn::system(prompts.system.as_str())),
            HistoryTurn::from(ChatTurn::user(prompts.user.as_str())),
        ];
        match self
            .run(&self.json_models, ResponseMode::Json, &messages, parse_object)
            .await
        {
            Ok(obj) => JsonDispatch::Parsed(obj),
            Err(exhaustion) => JsonDispatch::Exhausted(exhaustion),
        }
    }

    /// Normalizes `history`, appends `message` as the new user turn and returns
    /// the first non-empty free-text reply. `system` is prepended when given.
    pub async fn dispatch_chat(
        &self,
        system: Option<&str>,
        history: &[HistoryTurn],
        message: &str,
    ) -> ChatDispatch {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if let Some(system) = system {
            messages.push(HistoryTurn::from(ChatTurn::system(system)));
        }
        messages.extend(normalize(history));
        messages.push(HistoryTurn::from(ChatTurn::user(message)));

        match self
            .run(&self.chat_models, ResponseMode::Text, &messages, accept_text)
            .await
        {
            Ok(text) => ChatDispatch::Replied(text),
            Err(exhaustion) => ChatDispatch::Exhausted(exhaustion),
        }
    }

    async fn run<T, F>(
        &self,
        models: &ModelPriorityList,
        mode: ResponseMode,
        messages: &[HistoryTurn],
        accept: F,
    ) -> Result<T, Exhaustion>
    where
        F: Fn(String) -> Result<T, CandidateFailure>,
    {
        let dispatch_id = Uuid::new_v4();

        if self.credentials.is_empty() {
            debug!("Dispatch {dispatch_id}: no credentials configured, skipping provider calls");
            return Err(Exhaustion {
                reason: ExhaustionReason::NoCredentials,
                failures: Vec::new(),
            });
        }
        if models.is_empty() {
            warn!("Dispatch {dispatch_id}: model priority list is empty");
            return Err(Exhaustion {
                reason: ExhaustionReason::NoModels,
                failures: Vec::new(),
            });
        }

        let mut failures = Vec::new();

        for (key_index, credential) in self.credentials.iter() {
            for model in models.iter() {
                debug!("Dispatch {dispatch_id}: trying key#{key_index} with {model} ({mode:?})");

                let outcome = self
                    .attempt(credential, model, messages, mode)
                    .await
                    .and_then(&accept);

                match outcome {
                    Ok(value) => {
                        info!(
                            "Dispatch {dispatch_id} served by key#{key_index} / {model} after {} failed attempt(s)",
                            failures.len()
                        );
                        return Ok(value);
                    }
                    Err(failure) => {
                        warn!("Dispatch {dispatch_id}: key#{key_index} / {model} failed: {failure}");
                        let record =
                            FailureRecord::new(dispatch_id, key_index, model, failure.to_string());
                        self.failure_log.append(&record).await;
                        failures.push(record);
                    }
                }
            }
        }

        warn!(
            "Dispatch {dispatch_id} exhausted: {} candidate(s) failed",
            failures.len()
        );
        Err(Exhaustion {
            reason: ExhaustionReason::AllCandidatesFailed,
            failures,
        })
    }

    async fn attempt(
        &self,
        credential: &Credential,
        model: &str,
        messages: &[HistoryTurn],
        mode: ResponseMode,
    ) -> Result<String, CandidateFailure> {
        let request = CompletionRequest {
            credential,
            model,
            messages,
            mode,
        };
        match tokio::time::timeout(self.candidate_timeout, self.provider.complete(request)).await
        {
            Ok(result) => result.map_err(CandidateFailure::from),
            Err(_) => Err(CandidateFailure::Timeout(self.candidate_timeout)),
        }
    }
}

/// Sanitizes model output and parses it as a JSON object. If the cleaned text
/// does not parse, retries once on the outermost `{...}` span.
pub fn parse_object(raw: String) -> Result<JsonObject, CandidateFailure> {
    let cleaned = extract_json(&raw);
    let value = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => value,
        Err(e) => outermost_object(&cleaned)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or(CandidateFailure::InvalidJson(e))?,
    };
    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(CandidateFailure::NotAnObject),
    }
}

fn accept_text(raw: String) -> Result<String, CandidateFailure> {
    if raw.trim().is_empty() {
        return Err(CandidateFailure::Provider(LlmError::EmptyContent));
    }
    Ok(raw)
}
