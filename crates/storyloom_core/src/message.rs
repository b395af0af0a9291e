//! Message types for generation requests.

use crate::{Input, Role};
use serde::{Deserialize, Serialize};

/// A message in a generation request.
///
/// # Examples
///
/// ```
/// use storyloom_core::{Message, Role, Input};
///
/// let message = Message {
///     role: Role::User,
///     content: vec![Input::Text("Hello!".to_string())],
/// };
///
/// assert_eq!(message.role, Role::User);
/// assert_eq!(message.text(), "Hello!");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The content of the message
    pub content: Vec<Input>,
}

impl Message {
    /// Creates a new builder for `Message`.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Create a user message holding a single text input.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![Input::Text(text.into())],
        }
    }

    /// Concatenated text of all text inputs in this message.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(Input::as_text)
            .collect::<Vec<_>>()
            .join("")
    }
}
