//! Request and response types for text generation.

use crate::{Message, Output};
use serde::{Deserialize, Serialize};

/// Generic generation request.
///
/// # Examples
///
/// ```
/// use storyloom_core::{GenerateRequest, Message, Role, Input};
///
/// let request = GenerateRequest {
///     messages: vec![Message {
///         role: Role::User,
///         content: vec![Input::Text("Hello!".to_string())],
///     }],
///     max_tokens: Some(100),
///     temperature: Some(0.7),
///     model: Some("meta-llama/llama-3.1-8b-instruct:free".to_string()),
/// };
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(100));
/// ```
///
/// The builder fills unset fields with their defaults:
///
/// ```
/// use storyloom_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::user("Once upon a time")])
///     .temperature(0.9)
///     .build()
///     .unwrap();
/// assert_eq!(request.temperature, Some(0.9));
/// assert_eq!(request.max_tokens, None);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder,
)]
#[builder(setter(into, strip_option), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Model identifier to use
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Creates a new builder for `GenerateRequest`.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// A request holding one user message with the given prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            ..Default::default()
        }
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use storyloom_core::{GenerateResponse, Output};
///
/// let response = GenerateResponse {
///     outputs: vec![
///         Output::Text("The tide ".to_string()),
///         Output::Text("came in.".to_string()),
///     ],
/// };
///
/// assert_eq!(response.text(), "The tide came in.");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GenerateResponse {
    /// The generated outputs from the model
    pub outputs: Vec<Output>,
}

impl GenerateResponse {
    /// Concatenated text of all text outputs.
    pub fn text(&self) -> String {
        self.outputs
            .iter()
            .filter_map(Output::as_text)
            .collect::<Vec<_>>()
            .join("")
    }
}
