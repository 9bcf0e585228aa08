//! Mentor routes: `POST /api/chat` and the `/mentor` WebSocket.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures::{sink::SinkExt, stream::StreamExt, Sink};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{Dispatcher, HistoryTurn};
use crate::mentor::context::{ContextUpdate, UserContext};
use crate::mentor::{reply_language, stream_system_prompt, MENTOR_STREAM_SYSTEM, MENTOR_SYSTEM};
use crate::state::AppState;

/// Pause between streamed words.
pub const WORD_DELAY: Duration = Duration::from_millis(20);

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Earlier turns in either the `parts` or the `content` shape.
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    pub message: String,
}

/// POST /api/chat
///
/// Returns the reply in the client's history shape: `{role: "model", parts: [text]}`.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = state
        .dispatcher
        .dispatch_chat(Some(MENTOR_SYSTEM), &request.history, &request.message)
        .await
        .into_text();

    Ok(Json(json!({ "role": "model", "parts": [reply] })))
}

/// GET /mentor (WebSocket upgrade)
pub async fn handle_mentor_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state.dispatcher))
}

async fn handle_connection(socket: WebSocket, dispatcher: Dispatcher) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let mut context = UserContext::default();
    info!("Mentor connection {connection_id} opened");

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match parse_frame(&text) {
            Frame::Context(update) => {
                context.apply(update);
                debug!("Mentor connection {connection_id} context updated");
            }
            Frame::Message(message) => {
                let reply = mentor_reply(&dispatcher, &context, &message).await;
                if let Err(e) = stream_reply(&mut sender, &reply, WORD_DELAY).await {
                    debug!("Mentor connection {connection_id} send failed: {e}");
                    break;
                }
            }
            Frame::Ignored => {}
        }
    }

    info!("Mentor connection {connection_id} closed");
}

/// One inbound text frame.
#[derive(Debug)]
pub enum Frame {
    /// `{"context": {...}}` updates the connection's learner context.
    Context(ContextUpdate),
    Message(String),
    Ignored,
}

pub fn parse_frame(text: &str) -> Frame {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Frame::Ignored;
    }

    if trimmed.starts_with('{') {
        if let Ok(Value::Object(mut obj)) = serde_json::from_str::<Value>(trimmed) {
            if let Some(context) = obj.remove("context") {
                return match serde_json::from_value::<ContextUpdate>(context) {
                    Ok(update) => Frame::Context(update),
                    Err(e) => {
                        warn!("Ignoring malformed context frame: {e}");
                        Frame::Ignored
                    }
                };
            }
        }
    }

    Frame::Message(trimmed.to_string())
}

/// Chat dispatch with the learner context and reply language in the system prompt.
pub async fn mentor_reply(dispatcher: &Dispatcher, context: &UserContext, message: &str) -> String {
    let language = reply_language(message, context);
    debug!("Mentor reply language: {language}");
    let system = match stream_system_prompt(context, &language) {
        Ok(system) => system,
        Err(e) => {
            warn!("Falling back to context-free mentor prompt: {e}");
            MENTOR_STREAM_SYSTEM.to_string()
        }
    };
    dispatcher
        .dispatch_chat(Some(&system), &[], message)
        .await
        .into_text()
}

/// Sends `reply` one word at a time (each followed by a space), pausing
/// `delay` between words. Stops at the first failed send.
pub async fn stream_reply<S>(sink: &mut S, reply: &str, delay: Duration) -> Result<(), S::Error>
where
    S: Sink<Message> + Unpin,
{
    for word in reply.split(' ').filter(|w| !w.is_empty()) {
        sink.send(Message::Text(format!("{word} "))).await?;
        tokio::time::sleep(delay).await;
    }
    Ok(())
}
