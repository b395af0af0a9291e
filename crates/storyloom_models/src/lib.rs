//! Generation service clients for Storyloom.
//!
//! Every client implements [`storyloom_interface::StoryDriver`]. The
//! OpenAI-compatible client covers OpenRouter, OpenAI, Groq and any other
//! service speaking the chat-completions protocol.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod openai_compat;

pub use openai_compat::{
    ChatChoice, ChatMessage, ChatMessageBuilder, ChatRequest, ChatRequestBuilder, ChatResponse,
    ChatResponseMessage, OpenAICompatibleClient,
};
