//! Conversions between Storyloom and chat-completions types.

use super::dto::{ChatMessage, ChatRequest, ChatResponse, ErrorEnvelope};
use storyloom_core::{GenerateRequest, GenerateResponse, Output};
use storyloom_error::{ServiceError, ServiceErrorKind};

/// Request fields the client fills when the caller leaves them unset.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RequestDefaults<'a> {
    pub(crate) model: &'a str,
    pub(crate) temperature: Option<f32>,
    pub(crate) max_tokens: Option<u32>,
}

/// Build a chat-completions body from a generic request.
#[track_caller]
pub(crate) fn to_chat_request(
    req: &GenerateRequest,
    defaults: &RequestDefaults<'_>,
) -> Result<ChatRequest, ServiceError> {
    let messages = req
        .messages
        .iter()
        .map(|m| ChatMessage::builder().role(m.role.as_wire()).content(m.text()).build())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServiceError::new(ServiceErrorKind::Decode(format!("Builder error: {}", e))))?;

    ChatRequest::builder()
        .model(req.model.clone().unwrap_or_else(|| defaults.model.to_string()))
        .messages(messages)
        .temperature(req.temperature.or(defaults.temperature))
        .max_tokens(req.max_tokens.or(defaults.max_tokens))
        .build()
        .map_err(|e| ServiceError::new(ServiceErrorKind::Decode(format!("Builder error: {}", e))))
}

/// Collect the text of every choice, failing when there is none.
#[track_caller]
pub(crate) fn from_chat_response(resp: &ChatResponse) -> Result<GenerateResponse, ServiceError> {
    let outputs: Vec<Output> = resp
        .choices()
        .iter()
        .filter_map(|choice| {
            choice
                .message()
                .as_ref()
                .and_then(|m| m.content().clone())
                .or_else(|| choice.text().clone())
        })
        .filter(|text| !text.trim().is_empty())
        .map(Output::Text)
        .collect();

    if outputs.is_empty() {
        return Err(ServiceError::new(ServiceErrorKind::EmptyResponse));
    }

    Ok(GenerateResponse { outputs })
}

/// Human-readable message from a non-success response body.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_core::Message;

    fn defaults() -> RequestDefaults<'static> {
        RequestDefaults {
            model: "default-model",
            temperature: Some(0.7),
            max_tokens: None,
        }
    }

    #[test]
    fn test_request_uses_defaults_when_unset() {
        let req = GenerateRequest::from_prompt("Tell me about the sea");
        let chat = to_chat_request(&req, &defaults()).unwrap();

        assert_eq!(chat.model(), "default-model");
        assert_eq!(*chat.temperature(), Some(0.7));
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].role(), "user");
        assert_eq!(chat.messages()[0].content(), "Tell me about the sea");

        let body = serde_json::to_value(&chat).unwrap();
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_request_values_override_defaults() {
        let req = GenerateRequest {
            messages: vec![Message::user("hi")],
            max_tokens: Some(64),
            temperature: Some(0.1),
            model: Some("other-model".to_string()),
        };
        let chat = to_chat_request(&req, &defaults()).unwrap();

        assert_eq!(chat.model(), "other-model");
        assert_eq!(*chat.temperature(), Some(0.1));
        assert_eq!(*chat.max_tokens(), Some(64));
    }

    #[test]
    fn test_response_concatenates_choices() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices": [
                {"message": {"role": "assistant", "content": "The keeper "}},
                {"message": {"role": "assistant", "content": "woke."}}
            ]}"#,
        )
        .unwrap();

        let generated = from_chat_response(&resp).unwrap();
        assert_eq!(generated.text(), "The keeper woke.");
    }

    #[test]
    fn test_null_content_is_empty_response() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();

        let err = from_chat_response(&resp).unwrap_err();
        assert_eq!(err.kind, ServiceErrorKind::EmptyResponse);
    }

    #[test]
    fn test_error_message_prefers_envelope() {
        assert_eq!(
            error_message(r#"{"error": {"message": "Rate limit exceeded", "code": 429}}"#),
            "Rate limit exceeded"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "no response body");
    }
}
