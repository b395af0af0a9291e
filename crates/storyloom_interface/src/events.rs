//! Progress events emitted during a run.

use chrono::{DateTime, Utc};
use storyloom_error::PipelineStage;

/// One milestone of a story run.
///
/// Displays as a single `[timestamp] message` line.
///
/// # Examples
///
/// ```
/// use storyloom_error::PipelineStage;
/// use storyloom_interface::ProgressEvent;
///
/// let event = ProgressEvent::new(PipelineStage::WriteAct, "Act 2 written")
///     .with_chapter(1)
///     .with_act(2);
/// assert_eq!(*event.chapter(), Some(1));
/// let line = event.to_string();
/// assert!(line.starts_with('['));
/// assert!(line.ends_with("] Act 2 written"));
/// ```
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ProgressEvent {
    /// When the event was recorded
    timestamp: DateTime<Utc>,
    /// Stage the run was in
    stage: PipelineStage,
    /// 1-based chapter number, if the event concerns a chapter
    chapter: Option<usize>,
    /// 1-based act number, if the event concerns an act
    act: Option<usize>,
    /// One-line description
    message: String,
}

impl ProgressEvent {
    /// Record an event now.
    pub fn new(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            stage,
            chapter: None,
            act: None,
            message: message.into(),
        }
    }

    /// Attach the 1-based chapter number.
    pub fn with_chapter(mut self, chapter: usize) -> Self {
        self.chapter = Some(chapter);
        self
    }

    /// Attach the 1-based act number.
    pub fn with_act(mut self, act: usize) -> Self {
        self.act = Some(act);
        self
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.message
        )
    }
}
