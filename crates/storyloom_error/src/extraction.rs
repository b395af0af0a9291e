//! Structured extraction error types.

/// Parse and schema-validation failures at the chapter and act boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExtractionErrorKind {
    /// No JSON object could be located in the reformatting response
    #[display("No structured data found in response ({} chars)", _0)]
    NoStructuredData(usize),
    /// JSON was found but does not match the expected shape
    #[display("Failed to parse structured data: {}", _0)]
    Parse(String),
    /// Chapter list is empty
    #[display("Chapter list is empty")]
    NoChapters,
    /// A chapter title is empty or whitespace
    #[display("Chapter title is empty")]
    EmptyTitle,
    /// A chapter title carries an ordinal or "Chapter N" prefix
    #[display("Chapter title '{}' carries an ordinal or chapter-number prefix", _0)]
    OrdinalTitle(String),
    /// The same chapter title appears twice
    #[display("Chapter title '{}' appears more than once", _0)]
    DuplicateTitle(String),
    /// One of act-1, act-2, act-3 is absent
    #[display("Act '{}' is missing", _0)]
    MissingAct(String),
    /// A key other than act-1, act-2, act-3 is present
    #[display("Unexpected act key '{}'", _0)]
    UnexpectedAct(String),
    /// An act has an empty description
    #[display("Act '{}' has an empty description", _0)]
    EmptyActDescription(String),
}

/// Error type for structured extraction.
///
/// # Examples
///
/// ```
/// use storyloom_error::{ExtractionError, ExtractionErrorKind};
///
/// let err = ExtractionError::new(ExtractionErrorKind::MissingAct("act-3".into()));
/// assert!(format!("{}", err).contains("act-3"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", kind, line, file)]
pub struct ExtractionError {
    /// The specific error condition
    pub kind: ExtractionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new ExtractionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
