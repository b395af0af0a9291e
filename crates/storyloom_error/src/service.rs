//! Generation service error types.

/// Failure conditions of a single generation service call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceErrorKind {
    /// Credential environment variable is not set
    #[display("{} environment variable not set", _0)]
    MissingCredential(String),
    /// Request never produced an HTTP response (connect, timeout, body read)
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Service answered with a non-success status
    #[display("HTTP {} error: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Response body could not be decoded
    #[display("Failed to decode response: {}", _0)]
    Decode(String),
    /// Service answered successfully but produced no text
    #[display("Service returned an empty response")]
    EmptyResponse,
}

impl ServiceErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceErrorKind::Status { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ServiceErrorKind::Transport(_) => true,
            ServiceErrorKind::EmptyResponse => true,
            ServiceErrorKind::MissingCredential(_) | ServiceErrorKind::Decode(_) => false,
        }
    }
}

/// Generation service error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ServiceError, ServiceErrorKind};
///
/// let err = ServiceError::new(ServiceErrorKind::Status {
///     status: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(format!("{}", err).contains("503"));
/// assert!(err.kind.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The kind of error that occurred
    pub kind: ServiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
