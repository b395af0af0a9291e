//! OpenAI-compatible chat-completions client.

mod client;
mod conversion;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{
    ChatChoice, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatResponseMessage,
};
