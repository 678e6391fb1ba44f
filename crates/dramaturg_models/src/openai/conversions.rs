//! Conversions between core request types and the wire protocol.

use super::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use dramaturg_core::{GenerateRequest, GenerateResponse, Output, Role};
use dramaturg_error::{ModelError, ModelErrorKind};

/// Defaults applied when the request leaves a knob unset.
pub(crate) struct RequestDefaults<'a> {
    pub model: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

pub(crate) fn to_chat_request(
    req: &GenerateRequest,
    defaults: &RequestDefaults<'_>,
) -> Result<ChatCompletionRequest, ModelError> {
    let messages = req
        .messages
        .iter()
        .map(|message| ChatMessage {
            role: wire_role(message.role).to_string(),
            content: Some(message.content.clone()),
        })
        .collect::<Vec<_>>();

    ChatCompletionRequest::builder()
        .model(req.model.clone().unwrap_or_else(|| defaults.model.to_string()))
        .messages(messages)
        .temperature(Some(req.temperature.unwrap_or(defaults.temperature)))
        .max_tokens(Some(req.max_tokens.unwrap_or(defaults.max_tokens)))
        .build()
        .map_err(|e| ModelError::new(ModelErrorKind::ResponseParsing(e.to_string())))
}

pub(crate) fn from_chat_response(
    response: ChatCompletionResponse,
) -> Result<GenerateResponse, ModelError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ModelError::new(ModelErrorKind::EmptyCompletion));
    }

    Ok(GenerateResponse {
        outputs: vec![Output::Text(text)],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dramaturg_core::Message;

    const DEFAULTS: RequestDefaults<'static> = RequestDefaults {
        model: "deepseek-chat",
        temperature: 0.7,
        max_tokens: 4000,
    };

    #[test]
    fn request_falls_back_to_defaults() {
        let req = GenerateRequest {
            messages: vec![Message::system("sys"), Message::user("hi")],
            ..Default::default()
        };
        let chat = to_chat_request(&req, &DEFAULTS).unwrap();
        assert_eq!(chat.model, "deepseek-chat");
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1].content.as_deref(), Some("hi"));
        assert_eq!(chat.max_tokens, Some(4000));
    }

    #[test]
    fn request_overrides_win() {
        let req = GenerateRequest {
            messages: vec![Message::user("hi")],
            model: Some("qwen-max".to_string()),
            temperature: Some(0.2),
            ..Default::default()
        };
        let chat = to_chat_request(&req, &DEFAULTS).unwrap();
        assert_eq!(chat.model, "qwen-max");
        assert_eq!(chat.temperature, Some(0.2));
    }

    #[test]
    fn blank_completion_is_an_error() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"   "}}]}"#,
        )
        .unwrap();
        let err = from_chat_response(response).unwrap_err();
        assert_eq!(err.kind, ModelErrorKind::EmptyCompletion);

        let none: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(from_chat_response(none).is_err());
    }

    #[test]
    fn first_choice_becomes_text_output() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Scene 1: Rooftop"},"finish_reason":"stop"}]}"#,
        )
        .unwrap();
        let out = from_chat_response(response).unwrap();
        assert_eq!(out.text(), "Scene 1: Rooftop");
    }
}
