//! Per-chapter accumulator of already-written act text.

use storyloom_core::{ActText, join_acts};

/// Prose written so far in the current chapter.
///
/// The snapshot is the earlier acts joined exactly as the chapter will be
/// assembled, so a continuation prompt sees the same text the reader will.
///
/// # Examples
///
/// ```
/// use storyloom_core::ActText;
/// use storyloom_narrative::ContinuityBuffer;
///
/// let mut buffer = ContinuityBuffer::new();
/// buffer.append(ActText::new("The lamp flickered."));
/// buffer.append(ActText::new("Then it went dark."));
/// assert_eq!(buffer.snapshot(), "The lamp flickered.\nThen it went dark.");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContinuityBuffer {
    acts: Vec<ActText>,
}

impl ContinuityBuffer {
    /// An empty buffer for a new chapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished act.
    pub fn append(&mut self, act: ActText) {
        self.acts.push(act);
    }

    /// All text written so far, acts joined by a single newline.
    pub fn snapshot(&self) -> String {
        join_acts(&self.acts)
    }

    /// Forget everything, ready for the next chapter.
    ///
    /// [`StoryPipeline`](crate::StoryPipeline) never calls this: chapters may
    /// be written concurrently, so each one starts from its own empty buffer.
    /// A caller that writes chapters one after another with a single buffer
    /// resets it between them.
    pub fn reset(&mut self) {
        self.acts.clear();
    }

    /// Number of acts recorded.
    pub fn len(&self) -> usize {
        self.acts.len()
    }

    /// True before the first act is written.
    pub fn is_empty(&self) -> bool {
        self.acts.is_empty()
    }

    /// Consume into the acts in writing order.
    pub fn into_acts(self) -> Vec<ActText> {
        self.acts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_grows_with_each_act() {
        let mut buffer = ContinuityBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.snapshot(), "");

        buffer.append(ActText::new("one"));
        assert_eq!(buffer.snapshot(), "one");

        buffer.append(ActText::new("two\n"));
        assert_eq!(buffer.snapshot(), "one\ntwo\n");
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_reset_clears_chapter() {
        let mut buffer = ContinuityBuffer::new();
        buffer.append(ActText::new("old chapter"));
        buffer.reset();
        assert!(buffer.is_empty());
        assert_eq!(buffer.snapshot(), "");
    }
}
