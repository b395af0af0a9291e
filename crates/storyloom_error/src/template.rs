//! Template rendering error types.

/// Specific error conditions for prompt template rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TemplateErrorKind {
    /// A placeholder in the template has no value in the supplied variables
    #[display("Missing template variable '{}'", _0)]
    MissingVariable(String),
    /// No template is registered under the requested identifier
    #[display("Unknown template '{}'", _0)]
    UnknownTemplate(String),
    /// The placeholder pattern could not be compiled
    #[display("Invalid placeholder pattern: {}", _0)]
    Pattern(String),
}

/// Error type for template rendering.
///
/// # Examples
///
/// ```
/// use storyloom_error::{TemplateError, TemplateErrorKind};
///
/// let err = TemplateError::new(TemplateErrorKind::MissingVariable("story_prompt".into()));
/// assert!(format!("{}", err).contains("story_prompt"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Template Error: {} at line {} in {}", kind, line, file)]
pub struct TemplateError {
    /// The specific error condition
    pub kind: TemplateErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl TemplateError {
    /// Create a new TemplateError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TemplateErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
