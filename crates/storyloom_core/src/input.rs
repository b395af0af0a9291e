//! Input types for generation requests.

use serde::{Deserialize, Serialize};

/// Content supplied to the generation service.
///
/// Story prompts are text only.
///
/// # Examples
///
/// ```
/// use storyloom_core::Input;
///
/// let input = Input::Text("Write the opening scene.".to_string());
/// assert_eq!(input.as_text(), Some("Write the opening scene."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "type", content = "data")]
pub enum Input {
    /// Plain text input.
    Text(String),
}

impl Input {
    /// Text content of this input, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Input::Text(text) => Some(text),
        }
    }
}
