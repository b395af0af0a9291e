//! Output surfaces a run reports to.

use crate::ProgressEvent;
use storyloom_core::{ActKey, ActText, FullStory};

/// Receives story prose as it becomes available, in chapter and act order.
pub trait DisplaySink: Send + Sync {
    /// A chapter is about to be shown.
    fn chapter_started(&self, number: usize, title: &str);

    /// One act of the current chapter has been written.
    fn act_written(&self, chapter: usize, act: ActKey, text: &ActText);

    /// The whole story is assembled.
    fn story_finished(&self, _story: &FullStory) {}
}

/// Receives the timestamped progress stream of a run.
pub trait ProgressSink: Send + Sync {
    /// Append one event.
    fn record(&self, event: &ProgressEvent);
}

/// Display sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn chapter_started(&self, _number: usize, _title: &str) {}

    fn act_written(&self, _chapter: usize, _act: ActKey, _text: &ActText) {}
}
