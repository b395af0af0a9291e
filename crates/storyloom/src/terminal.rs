//! Terminal output sinks.
//!
//! Story prose goes to stdout and progress lines to stderr, so the story can
//! be redirected to a file while progress stays on screen.

use std::io::Write;
use std::sync::{Mutex, MutexGuard};
use storyloom_core::{ActKey, ActText, FullStory};
use storyloom_interface::{DisplaySink, ProgressEvent, ProgressSink};

/// Writes chapter headings and act prose as they are released.
///
/// # Examples
///
/// ```
/// use storyloom::{ActKey, ActText, DisplaySink, TerminalDisplay};
///
/// let display = TerminalDisplay::new(Vec::new());
/// display.chapter_started(1, "The Keeper");
/// display.act_written(1, ActKey::Act1, &ActText::new("The lamp burned."));
///
/// let text = String::from_utf8(display.into_inner()).unwrap();
/// assert_eq!(text, "\nChapter 1: The Keeper\n\nThe lamp burned.\n");
/// ```
#[derive(Debug)]
pub struct TerminalDisplay<W> {
    out: Mutex<W>,
}

impl TerminalDisplay<std::io::Stdout> {
    /// Display on standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    /// Display on any writer.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        self.out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> DisplaySink for TerminalDisplay<W> {
    fn chapter_started(&self, number: usize, title: &str) {
        let mut out = self.lock();
        if let Err(e) = writeln!(out, "\nChapter {}: {}\n", number, title).and_then(|_| out.flush())
        {
            tracing::warn!(error = %e, "Failed to write chapter heading");
        }
    }

    fn act_written(&self, _chapter: usize, _act: ActKey, text: &ActText) {
        let mut out = self.lock();
        if let Err(e) = writeln!(out, "{}", text).and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "Failed to write act text");
        }
    }

    fn story_finished(&self, story: &FullStory) {
        tracing::debug!(story_len = story.as_str().len(), "Story displayed");
    }
}

/// Writes each progress event as one `[timestamp] message` line.
///
/// # Examples
///
/// ```
/// use storyloom::{PipelineStage, ProgressEvent, ProgressSink, TerminalProgress};
///
/// let progress = TerminalProgress::new(Vec::new());
/// progress.record(&ProgressEvent::new(PipelineStage::Start, "Starting story generation process"));
///
/// let text = String::from_utf8(progress.into_inner()).unwrap();
/// assert!(text.starts_with('['));
/// assert!(text.ends_with("] Starting story generation process\n"));
/// ```
#[derive(Debug)]
pub struct TerminalProgress<W> {
    out: Mutex<W>,
}

impl TerminalProgress<std::io::Stderr> {
    /// Progress on standard error.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> TerminalProgress<W> {
    /// Progress on any writer.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> ProgressSink for TerminalProgress<W> {
    fn record(&self, event: &ProgressEvent) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", event) {
            tracing::warn!(error = %e, "Failed to write progress line");
        }
    }
}
