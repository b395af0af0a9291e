//! Run-scoped progress log.

use std::sync::{Arc, Mutex, MutexGuard};
use storyloom_interface::{ProgressEvent, ProgressSink};

/// Timestamped progress events of the current run.
///
/// Cleared at the start of every run. Each event is kept for inspection,
/// forwarded to the attached [`ProgressSink`] and mirrored to `tracing`.
///
/// # Examples
///
/// ```
/// use storyloom_error::PipelineStage;
/// use storyloom_interface::ProgressEvent;
/// use storyloom_narrative::EventLog;
///
/// let log = EventLog::new();
/// log.record(ProgressEvent::new(PipelineStage::Start, "Starting"));
/// assert_eq!(log.len(), 1);
/// log.clear();
/// assert!(log.entries().is_empty());
/// ```
#[derive(Default)]
pub struct EventLog {
    entries: Mutex<Vec<ProgressEvent>>,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("entries", &self.len())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl EventLog {
    /// An empty log with no sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every recorded event to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ProgressEvent>> {
        // A panicking sink must not lose the log
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append an event.
    pub fn record(&self, event: ProgressEvent) {
        // Progress sinks own user-facing output; tracing gets a debug copy
        tracing::debug!(
            stage = %event.stage(),
            chapter = ?event.chapter(),
            act = ?event.act(),
            "{}",
            event.message()
        );
        if let Some(sink) = &self.sink {
            sink.record(&event);
        }
        self.lock().push(event);
    }

    /// Drop all events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Copy of the events recorded so far.
    pub fn entries(&self) -> Vec<ProgressEvent> {
        self.lock().clone()
    }

    /// Number of events recorded.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// One-line preview of generated text.
///
/// Newlines become spaces. Text longer than `max_chars` characters is cut and
/// ends with `...`.
///
/// # Examples
///
/// ```
/// use storyloom_narrative::preview;
///
/// assert_eq!(preview("Waves\nbroke", 100), "Waves broke");
/// assert_eq!(preview("abcdef", 3), "abc...");
/// ```
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use storyloom_error::PipelineStage;

    struct Collect(Mutex<Vec<String>>);

    impl ProgressSink for Collect {
        fn record(&self, event: &ProgressEvent) {
            if let Ok(mut lines) = self.0.lock() {
                lines.push(event.message().clone());
            }
        }
    }

    #[test]
    fn test_events_forwarded_in_order() {
        let sink = Arc::new(Collect(Mutex::new(Vec::new())));
        let log = EventLog::new().with_sink(sink.clone());

        log.record(ProgressEvent::new(PipelineStage::Start, "first"));
        log.record(ProgressEvent::new(PipelineStage::WriteAct, "second").with_chapter(1));

        assert_eq!(*sink.0.lock().unwrap(), vec!["first", "second"]);
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(*entries[1].chapter(), Some(1));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn traced_output(level: &str) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(level))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            EventLog::new().record(ProgressEvent::new(PipelineStage::Start, "lamp lit"));
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_events_traced_below_info() {
        assert!(!traced_output("info").contains("lamp lit"));
        assert!(traced_output("debug").contains("lamp lit"));
    }

    #[test]
    fn test_preview_counts_characters() {
        assert_eq!(preview("ééééé", 2), "éé...");
        assert_eq!(preview("short", 5), "short");
        assert_eq!(preview("a\r\nb", 10), "a  b");
    }
}
