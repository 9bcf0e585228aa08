//! In-memory providers for driving the dispatcher deterministically in tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::llm_client::{
    ChatProvider, CompletionRequest, CredentialPool, Dispatcher, HistoryTurn, LlmError,
    ModelPriorityList, ResponseMode,
};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub credential: String,
    pub model: String,
    pub mode: ResponseMode,
    pub messages: Vec<HistoryTurn>,
}

/// Replies with a fixed script, one entry per call, and records every call.
/// Once the script runs out every call fails.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new(script: impl IntoIterator<Item = Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The user message of the `n`th call.
    pub fn user_prompt(&self, n: usize) -> String {
        let calls = self.calls();
        calls[n]
            .messages
            .iter()
            .rev()
            .find_map(|turn| match turn {
                HistoryTurn::Unified(t) if t.role == crate::llm_client::history::Role::User => {
                    Some(t.content.clone())
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    /// The system message of the `n`th call.
    pub fn system_prompt(&self, n: usize) -> String {
        let calls = self.calls();
        calls[n]
            .messages
            .iter()
            .find_map(|turn| match turn {
                HistoryTurn::Unified(t) if t.role == crate::llm_client::history::Role::System => {
                    Some(t.content.clone())
                }
                _ => None,
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            credential: request.credential.expose().to_string(),
            model: request.model.to_string(),
            mode: request.mode,
            messages: request.messages.to_vec(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| fail("script exhausted"))
    }
}

/// Never answers. Used to exercise the per-candidate timeout.
pub struct HangingProvider;

#[async_trait]
impl ChatProvider for HangingProvider {
    async fn complete(&self, _request: CompletionRequest<'_>) -> Result<String, LlmError> {
        std::future::pending().await
    }
}

pub fn ok(text: &str) -> Result<String, LlmError> {
    Ok(text.to_string())
}

pub fn fail(message: &str) -> Result<String, LlmError> {
    Err(LlmError::Api {
        status: 503,
        message: message.to_string(),
    })
}

/// A dispatcher over `provider` with explicit keys and model lists, no failure log.
pub fn dispatcher_with(
    provider: Arc<dyn ChatProvider>,
    keys: &[&str],
    json_models: &[&str],
    chat_models: &[&str],
) -> Dispatcher {
    Dispatcher::new(provider, CredentialPool::from_comma_separated(&keys.join(",")))
        .with_models(
            ModelPriorityList::new(json_models.iter().copied()),
            ModelPriorityList::new(chat_models.iter().copied()),
        )
}

/// Single key, single JSON model, single chat model.
pub fn single_candidate(provider: Arc<dyn ChatProvider>) -> Dispatcher {
    dispatcher_with(provider, &["test-key"], &["json-model"], &["chat-model"])
}
