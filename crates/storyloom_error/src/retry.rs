//! Transient versus permanent failure classification.

use crate::{ServiceError, StoryloomError, StoryloomErrorKind};

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use storyloom_error::{
///     ExtractionError, ExtractionErrorKind, RetryableError, ServiceError, ServiceErrorKind,
///     StoryloomError,
/// };
///
/// let unavailable: StoryloomError = ServiceError::new(ServiceErrorKind::Status {
///     status: 503,
///     message: "Service unavailable".to_string(),
/// })
/// .into();
/// assert!(unavailable.is_retryable());
///
/// let unauthorized: StoryloomError = ServiceError::new(ServiceErrorKind::Status {
///     status: 401,
///     message: "bad key".to_string(),
/// })
/// .into();
/// assert!(!unauthorized.is_retryable());
///
/// let malformed: StoryloomError = ExtractionError::new(ExtractionErrorKind::NoChapters).into();
/// assert!(malformed.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503, 429, network failures or malformed
    /// structured output should return true. Permanent errors like 401,
    /// missing template variables or bad configuration should return false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ServiceError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl RetryableError for StoryloomError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            StoryloomErrorKind::Service(e) => e.is_retryable(),
            StoryloomErrorKind::Extraction(_) => true,
            StoryloomErrorKind::Template(_) | StoryloomErrorKind::Config(_) => false,
            StoryloomErrorKind::Pipeline(_) => false,
        }
    }
}
