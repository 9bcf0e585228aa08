/// LLM Client: the single point of entry for all provider calls in the API.
///
/// ARCHITECTURAL RULE: No other module may call the provider directly.
/// Feature code talks to the `Dispatcher`, which walks the credential pool and
/// model priority lists and drives a `ChatProvider` one candidate at a time.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod credentials;
pub mod dispatcher;
pub mod failure_log;
pub mod history;
pub mod models;
pub mod prompts;
pub mod sanitizer;

#[cfg(test)]
pub mod testing;

pub use credentials::{Credential, CredentialPool};
pub use dispatcher::{Dispatcher, JsonDispatch, JsonObject, PromptPair};
pub use history::HistoryTurn;
pub use models::{ModelPriorityList, ResponseMode};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const APP_TITLE: &str = "Career Spark";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4096;
/// Transport-level ceiling. The dispatcher applies its own, shorter, per-candidate bound.
const HTTP_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One candidate attempt: which key, which model, what to send.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub credential: &'a Credential,
    pub model: &'a str,
    pub messages: &'a [HistoryTurn],
    pub mode: ResponseMode,
}

/// A chat-completion backend. One call = one candidate attempt; implementations
/// must not retry internally.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [HistoryTurn],
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
    /// Some gateways report upstream failures inside a 200 body.
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    pub code: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

impl ChatCompletionResponse {
    /// Text content of the first choice, if non-blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

/// OpenAI-compatible chat-completions client (OpenRouter by default).
/// Holds no credentials: every call names the key it should use.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    referer: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, referer: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            referer: referer.into(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatProvider for LlmClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: request.model,
            messages: request.messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: match request.mode {
                ResponseMode::Json => Some(ResponseFormat {
                    format_type: "json_object",
                }),
                ResponseMode::Text => None,
            },
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(request.credential.expose())
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", APP_TITLE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&response.text().await?)?;

        if let Some(err) = completion.error {
            let status = err
                .code
                .as_ref()
                .and_then(|c| c.as_u64())
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(status.as_u16());
            return Err(LlmError::Api {
                status,
                message: err.message,
            });
        }

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}
