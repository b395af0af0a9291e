//! Chat-completions data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One message in a chat-completions request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatMessage {
    /// Lowercase role name
    role: String,
    /// Message text
    content: String,
}

impl ChatMessage {
    /// Creates a new builder for `ChatMessage`.
    pub fn builder() -> ChatMessageBuilder {
        ChatMessageBuilder::default()
    }
}

/// Chat-completions request body.
#[derive(Debug, Clone, PartialEq, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Conversation messages
    messages: Vec<ChatMessage>,
    /// Sampling temperature
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum tokens to generate
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Creates a new builder for `ChatRequest`.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Message returned inside a choice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct ChatResponseMessage {
    /// Generated text, absent for refusals and tool calls
    #[serde(default)]
    content: Option<String>,
}

/// One completion choice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct ChatChoice {
    /// Chat-style message
    #[serde(default)]
    message: Option<ChatResponseMessage>,
    /// Legacy completion text
    #[serde(default)]
    text: Option<String>,
    /// Why generation stopped
    #[serde(default)]
    finish_reason: Option<String>,
}

/// Chat-completions response body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct ChatResponse {
    /// Completion choices
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: ErrorDetail,
}

/// Detail of an error body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    pub(crate) message: String,
}
