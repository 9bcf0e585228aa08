// AI mentor: stateless REST chat and the per-connection WebSocket stream.
// Replies come from Dispatcher::dispatch_chat, so exhaustion yields the
// apology text rather than an error.

pub mod context;
pub mod handlers;

use crate::advisor::to_prompt_json;
use crate::errors::AppError;
use crate::mentor::context::UserContext;

/// System prompt for `POST /api/chat`.
pub const MENTOR_SYSTEM: &str = "You are a helpful, human-like AI career mentor. \
    Be encouraging, specific and clear. Keep answers concise and practical.";

/// Base system prompt for the streaming mentor. The learner context is appended.
pub const MENTOR_STREAM_SYSTEM: &str = "You are an AI Career Mentor. \
    Guide the user step by step and explain clearly. \
    Personalize every answer to the user context below and ask a clarifying \
    question when the request is ambiguous. \
    Always respond in the same language as the user's message.";

/// Language for the next reply: detected from the message when the detector
/// is confident, otherwise the language code the client put in the context.
pub fn reply_language(message: &str, context: &UserContext) -> String {
    match whatlang::detect(message) {
        Some(info) if info.is_reliable() => {
            format!("{} ({})", info.lang().eng_name(), info.lang().code())
        }
        _ => context.language.clone(),
    }
}

/// Stream system prompt with the learner context and reply language embedded.
pub fn stream_system_prompt(context: &UserContext, language: &str) -> Result<String, AppError> {
    Ok(format!(
        "{MENTOR_STREAM_SYSTEM}\n\nUSER CONTEXT:\n{}\n\nReply language: {language}",
        to_prompt_json(context, "user context")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_prompt_embeds_context() {
        let mut context = UserContext::default();
        context.skills = vec!["Python".to_string()];
        context.language = "hi".to_string();

        let prompt = stream_system_prompt(&context, "hi").unwrap();

        assert!(prompt.starts_with(MENTOR_STREAM_SYSTEM));
        assert!(prompt.contains("\"Python\""));
        assert!(prompt.ends_with("Reply language: hi"));
    }

    #[test]
    fn test_reply_language_detected_from_message() {
        let context = UserContext::default();
        let language = reply_language("데이터 분석가가 되려면 무엇을 배워야 하나요?", &context);
        assert_eq!(language, "Korean (kor)");
    }

    #[test]
    fn test_reply_language_falls_back_to_context() {
        let mut context = UserContext::default();
        context.language = "ta".to_string();
        assert_eq!(reply_language("12345 ?!", &context), "ta");
        assert_eq!(reply_language("", &context), "ta");
    }
}
