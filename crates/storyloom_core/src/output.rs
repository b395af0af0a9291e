//! Output types from generation responses.

use serde::{Deserialize, Serialize};

/// Content produced by the generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "type", content = "data")]
pub enum Output {
    /// Plain text output.
    Text(String),
}

impl Output {
    /// Text content of this output, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
        }
    }
}
