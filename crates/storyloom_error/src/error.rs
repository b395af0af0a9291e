//! Top-level error wrapper types.

use crate::{ConfigError, ExtractionError, PipelineError, ServiceError, TemplateError};

/// The union of every error family in the workspace.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomError, StoryloomErrorKind, ConfigError};
///
/// let err: StoryloomError = ConfigError::new("bad model").into();
/// assert!(matches!(err.kind(), StoryloomErrorKind::Config(_)));
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryloomErrorKind {
    /// Prompt template rendering error
    #[from(TemplateError)]
    Template(TemplateError),
    /// Generation service error
    #[from(ServiceError)]
    Service(ServiceError),
    /// Structured extraction error
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Failure annotated with pipeline stage context
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Storyloom error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyloom_error::{StoryloomResult, TemplateError, TemplateErrorKind};
///
/// fn might_fail() -> StoryloomResult<()> {
///     Err(TemplateError::new(TemplateErrorKind::UnknownTemplate("nope".into())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyloom Error: {}", _0)]
pub struct StoryloomError(Box<StoryloomErrorKind>);

impl StoryloomError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryloomErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryloomErrorKind {
        &self.0
    }

    /// Get the innermost error kind, looking through pipeline context.
    pub fn root_kind(&self) -> &StoryloomErrorKind {
        match self.kind() {
            StoryloomErrorKind::Pipeline(pipeline) => pipeline.cause().root_kind(),
            kind => kind,
        }
    }

    /// Get the pipeline context if this error aborted a run.
    pub fn pipeline(&self) -> Option<&PipelineError> {
        match self.kind() {
            StoryloomErrorKind::Pipeline(pipeline) => Some(pipeline),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to StoryloomErrorKind
impl<T> From<T> for StoryloomError
where
    T: Into<StoryloomErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyloom operations.
pub type StoryloomResult<T> = std::result::Result<T, StoryloomError>;
