//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Author of a message in a generation request.
///
/// # Examples
///
/// ```
/// use storyloom_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// assert_eq!(Role::User.as_wire(), "user");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages carry the stage prompt
    User,
    /// Assistant messages are from the model
    Assistant,
}

impl Role {
    /// Lowercase role name used by chat-completions APIs.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
