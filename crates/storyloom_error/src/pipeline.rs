//! Pipeline stage context for aborted runs.

use crate::StoryloomError;

/// The stages of a story run, in execution order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display,
)]
pub enum PipelineStage {
    /// Run accepted its prompt
    #[display("start")]
    Start,
    /// Pick a story structure for the prompt
    #[display("choose structure")]
    ChooseStructure,
    /// Reduce the structure analysis to what and how
    #[display("summarize structure")]
    SummarizeStructure,
    /// Produce the story blueprint
    #[display("build blueprint")]
    BuildBlueprint,
    /// Reformat the blueprint's chapter list into a chapter map
    #[display("extract chapters")]
    ExtractChapters,
    /// Outline the three acts of a chapter in prose
    #[display("generate acts")]
    GenerateActs,
    /// Reformat the act outline into an act set
    #[display("extract acts")]
    ExtractActs,
    /// Write the prose for one act
    #[display("write act")]
    WriteAct,
    /// Join the finished chapter
    #[display("finalize chapter")]
    FinalizeChapter,
    /// Join all chapters into the full story
    #[display("assemble story")]
    AssembleStory,
}

/// A failure annotated with the stage, chapter and act where the run stopped.
///
/// Chapter and act numbers are 1-based.
///
/// # Examples
///
/// ```
/// use storyloom_error::{PipelineError, PipelineStage, ServiceError, ServiceErrorKind};
///
/// let cause = ServiceError::new(ServiceErrorKind::EmptyResponse);
/// let err = PipelineError::new(PipelineStage::WriteAct, cause)
///     .with_chapter(2)
///     .with_act(3);
/// let text = format!("{}", err);
/// assert!(text.contains("write act"));
/// assert!(text.contains("chapter 2"));
/// assert!(text.contains("act 3"));
/// ```
#[derive(Debug, derive_more::Error)]
pub struct PipelineError {
    /// Stage that failed
    pub stage: PipelineStage,
    /// Chapter being processed, if any
    pub chapter: Option<usize>,
    /// Act being processed, if any
    pub act: Option<usize>,
    /// Underlying failure
    pub source: Box<StoryloomError>,
}

impl PipelineError {
    /// Wrap a failure that happened during `stage`.
    pub fn new(stage: PipelineStage, source: impl Into<StoryloomError>) -> Self {
        Self {
            stage,
            chapter: None,
            act: None,
            source: Box::new(source.into()),
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

    /// The wrapped failure.
    pub fn cause(&self) -> &StoryloomError {
        &self.source
    }
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pipeline Error: stage '{}'", self.stage)?;
        if let Some(chapter) = self.chapter {
            write!(f, ", chapter {}", chapter)?;
        }
        if let Some(act) = self.act {
            write!(f, ", act {}", act)?;
        }
        write!(f, " failed: {}", self.source)
    }
}
