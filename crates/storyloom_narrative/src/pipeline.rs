//! Story pipeline orchestration.
//!
//! This module sequences the generation stages of a run, drives the chapter
//! and act iterations, and assembles the finished story.

use crate::{
    ContinuityBuffer, EventLog, StructuredExtractor, TemplateEngine, TemplateId, TemplateVars,
    preview,
};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use storyloom_core::{
    ActKey, ActText, Blueprint, Chapter, ChapterMap, ChapterText, FullStory, StoryPrompt,
    StructureChoice, StructureSummary,
};
use storyloom_error::{
    ConfigError, ExtractionError, ExtractionErrorKind, PipelineError, PipelineStage,
    StoryloomError, StoryloomResult,
};
use storyloom_interface::{DisplaySink, NullDisplay, ProgressEvent, ProgressSink, StoryDriver};
use storyloom_rate_limit::{PipelineConfig, RetryConfig, StoryloomConfig, execute_with_retry};

/// Everything a successful run produced.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct StoryRun {
    /// The story idea the run started from
    prompt: StoryPrompt,
    /// Structure analysis
    structure: StructureChoice,
    /// Condensed structure to apply
    structure_summary: StructureSummary,
    /// Planning document
    blueprint: Blueprint,
    /// Chapters in narrative order
    chapters: ChapterMap,
    /// Assembled prose of each chapter, in narrative order
    chapter_texts: Vec<ChapterText>,
    /// All chapters joined
    full_story: FullStory,
}

/// A written chapter waiting for its turn on the display.
struct ChapterDraft {
    number: usize,
    acts: [ActText; 3],
    text: ChapterText,
}

/// Drives a [`StoryDriver`] through the stages of a story run.
///
/// Each stage depends on the output of the one before it. Within a chapter
/// the acts are written in order and each later act sees the prose of the
/// earlier ones. Chapters may run concurrently up to
/// `max_concurrent_chapters`; output always reaches the display in chapter
/// order. The first failure aborts the run.
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = StoryPipeline::new(client)
///     .with_config(&config)
///     .with_display(Arc::new(StdoutDisplay));
/// let run = pipeline.run("A lonely lighthouse keeper discovers a message in a bottle").await?;
/// assert!(!run.chapters().is_empty());
/// ```
pub struct StoryPipeline<D: StoryDriver> {
    driver: Arc<D>,
    templates: TemplateEngine,
    pipeline: PipelineConfig,
    retry: RetryConfig,
    display: Arc<dyn DisplaySink>,
    events: EventLog,
}

impl<D: StoryDriver> StoryPipeline<D> {
    /// Create a pipeline with bundled templates and default settings.
    pub fn new(driver: D) -> Self {
        Self::from_shared(Arc::new(driver))
    }

    /// Create a pipeline around a driver that is shared elsewhere.
    pub fn from_shared(driver: Arc<D>) -> Self {
        Self {
            driver,
            templates: TemplateEngine::new(),
            pipeline: PipelineConfig::default(),
            retry: RetryConfig::default(),
            display: Arc::new(NullDisplay),
            events: EventLog::new(),
        }
    }

    /// Apply the pipeline and retry sections of a loaded configuration.
    pub fn with_config(self, config: &StoryloomConfig) -> Self {
        self.with_pipeline_config(config.pipeline)
            .with_retry(config.retry)
    }

    /// Set orchestration settings.
    pub fn with_pipeline_config(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Set retry policies.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the prompt templates.
    pub fn with_templates(mut self, templates: TemplateEngine) -> Self {
        self.templates = templates;
        self
    }

    /// Send story prose to `display`.
    pub fn with_display(mut self, display: Arc<dyn DisplaySink>) -> Self {
        self.display = display;
        self
    }

    /// Forward progress events to `sink`.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.events = EventLog::new().with_sink(sink);
        self
    }

    /// The generation service.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Progress events of the most recent run.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Turn a story idea into a finished multi-chapter story.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] naming the failed stage, and the chapter and
    /// act where applicable. No partial story is returned.
    #[tracing::instrument(
        skip(self, prompt),
        fields(
            provider = self.driver.provider_name(),
            model = self.driver.model_name(),
            max_concurrent_chapters = self.pipeline.max_concurrent_chapters()
        )
    )]
    pub async fn run(&self, prompt: impl Into<String>) -> StoryloomResult<StoryRun> {
        self.events.clear();

        let prompt = StoryPrompt::new(prompt);
        if prompt.is_blank() {
            return Err(self.abort(PipelineError::new(
                PipelineStage::Start,
                ConfigError::new("Story prompt is empty"),
            )));
        }
        self.record(ProgressEvent::new(
            PipelineStage::Start,
            "Starting story generation process",
        ));

        // Structure
        self.record(ProgressEvent::new(
            PipelineStage::ChooseStructure,
            "Determining story structure",
        ));
        let structure_prompt = self
            .render(
                PipelineStage::ChooseStructure,
                TemplateId::ChooseStructure,
                &TemplateVars::new().with("story_prompt", &prompt),
            )
            .map_err(|e| self.abort(e))?;
        let structure = StructureChoice::from(
            self.generate(PipelineStage::ChooseStructure, &structure_prompt)
                .await
                .map_err(|e| self.abort(PipelineError::new(PipelineStage::ChooseStructure, e)))?,
        );
        self.record(ProgressEvent::new(
            PipelineStage::ChooseStructure,
            "Story structure chosen",
        ));

        self.record(ProgressEvent::new(
            PipelineStage::SummarizeStructure,
            "Summarizing story structure",
        ));
        let summary_prompt = self
            .render(
                PipelineStage::SummarizeStructure,
                TemplateId::SummarizeStructure,
                &TemplateVars::new().with("structure_analysis", &structure),
            )
            .map_err(|e| self.abort(e))?;
        let structure_summary = StructureSummary::from(
            self.generate(PipelineStage::SummarizeStructure, &summary_prompt)
                .await
                .map_err(|e| {
                    self.abort(PipelineError::new(PipelineStage::SummarizeStructure, e))
                })?,
        );
        self.record(ProgressEvent::new(
            PipelineStage::SummarizeStructure,
            "Story structure summarized",
        ));

        // Blueprint
        self.record(ProgressEvent::new(
            PipelineStage::BuildBlueprint,
            "Generating story blueprint",
        ));
        let blueprint_prompt = self
            .render(
                PipelineStage::BuildBlueprint,
                TemplateId::Blueprint,
                &TemplateVars::new()
                    .with("structure_summary", &structure_summary)
                    .with("story_prompt", &prompt),
            )
            .map_err(|e| self.abort(e))?;
        let blueprint = Blueprint::from(
            self.generate(PipelineStage::BuildBlueprint, &blueprint_prompt)
                .await
                .map_err(|e| self.abort(PipelineError::new(PipelineStage::BuildBlueprint, e)))?,
        );
        self.record(ProgressEvent::new(
            PipelineStage::BuildBlueprint,
            "Story blueprint created",
        ));
        if let Some(title) = blueprint.title() {
            self.record(ProgressEvent::new(
                PipelineStage::BuildBlueprint,
                format!("Story title: {}", title),
            ));
        }

        // Chapters
        self.record(ProgressEvent::new(
            PipelineStage::ExtractChapters,
            "Converting chapter list to JSON",
        ));
        let extractor = StructuredExtractor::new(Arc::clone(&self.driver))
            .with_templates(self.templates.clone())
            .with_policy(self.retry.extraction);
        let chapters = extractor
            .extract_chapters(&blueprint)
            .await
            .map_err(|e| self.abort(PipelineError::new(PipelineStage::ExtractChapters, e)))?;
        self.record(ProgressEvent::new(
            PipelineStage::ExtractChapters,
            format!(
                "Extracted {} chapters: {}",
                chapters.len(),
                chapters.titles().collect::<Vec<_>>().join(", ")
            ),
        ));

        let chapter_texts = self
            .write_chapters(&chapters, &blueprint, &prompt, &extractor)
            .await?;

        // Assembly
        let full_story = FullStory::assemble(&chapter_texts);
        self.record(ProgressEvent::new(
            PipelineStage::AssembleStory,
            "Story generation complete",
        ));
        self.record(ProgressEvent::new(
            PipelineStage::AssembleStory,
            format!(
                "Full story text (first {} characters): {}",
                self.pipeline.story_preview_chars(),
                preview(full_story.as_str(), *self.pipeline.story_preview_chars())
            ),
        ));
        self.display.story_finished(&full_story);

        Ok(StoryRun {
            prompt,
            structure,
            structure_summary,
            blueprint,
            chapters,
            chapter_texts,
            full_story,
        })
    }

    /// Write every chapter, releasing them to the display in narrative order.
    async fn write_chapters(
        &self,
        chapters: &ChapterMap,
        blueprint: &Blueprint,
        prompt: &StoryPrompt,
        extractor: &StructuredExtractor<D>,
    ) -> StoryloomResult<Vec<ChapterText>> {
        let limit = (*self.pipeline.max_concurrent_chapters()).max(1);
        let live = limit == 1;

        let mut pending = stream::iter(chapters.iter().enumerate())
            .map(|(index, chapter)| async move {
                self.write_chapter(index + 1, chapter, blueprint, prompt, extractor, live)
                    .await
            })
            .buffer_unordered(limit);

        let mut finished: BTreeMap<usize, ChapterDraft> = BTreeMap::new();
        let mut texts = Vec::with_capacity(chapters.len());
        let mut next = 1;

        while let Some(result) = pending.next().await {
            // Dropping the stream cancels chapters still in flight
            let draft = result?;
            finished.insert(draft.number, draft);

            while let Some(draft) = finished.remove(&next) {
                if !live {
                    self.release(&draft);
                }
                texts.push(draft.text);
                next += 1;
            }
        }

        Ok(texts)
    }

    fn release(&self, draft: &ChapterDraft) {
        self.display
            .chapter_started(draft.number, draft.text.title());
        for (key, text) in ActKey::all().zip(draft.acts.iter()) {
            self.display.act_written(draft.number, key, text);
        }
    }

    #[tracing::instrument(skip_all, fields(chapter = number, title = %chapter.title()))]
    async fn write_chapter(
        &self,
        number: usize,
        chapter: &Chapter,
        blueprint: &Blueprint,
        prompt: &StoryPrompt,
        extractor: &StructuredExtractor<D>,
        live: bool,
    ) -> StoryloomResult<ChapterDraft> {
        let title = chapter.title();
        let description = chapter.description();

        self.record(
            ProgressEvent::new(
                PipelineStage::GenerateActs,
                format!("Processing Chapter {}: {}", number, title),
            )
            .with_chapter(number),
        );
        if live {
            self.display.chapter_started(number, title);
        }

        // Act outline
        self.record(
            ProgressEvent::new(
                PipelineStage::GenerateActs,
                format!("Generating acts for Chapter {}", number),
            )
            .with_chapter(number),
        );
        let outline_prompt = self
            .render(
                PipelineStage::GenerateActs,
                TemplateId::ActOutline,
                &TemplateVars::new()
                    .with("blueprint", blueprint)
                    .with("chapter_number", number)
                    .with("chapter_title", title)
                    .with("chapter_description", description),
            )
            .map_err(|e| self.abort(e.with_chapter(number)))?;
        let outline = self
            .generate(PipelineStage::GenerateActs, &outline_prompt)
            .await
            .map_err(|e| {
                self.abort(PipelineError::new(PipelineStage::GenerateActs, e).with_chapter(number))
            })?;
        self.record(
            ProgressEvent::new(
                PipelineStage::GenerateActs,
                format!("Generated acts for Chapter {}", number),
            )
            .with_chapter(number),
        );

        self.record(
            ProgressEvent::new(
                PipelineStage::ExtractActs,
                format!("Converting acts to JSON for Chapter {}", number),
            )
            .with_chapter(number),
        );
        let acts = extractor.extract_acts(&outline).await.map_err(|e| {
            self.abort(PipelineError::new(PipelineStage::ExtractActs, e).with_chapter(number))
        })?;
        self.record(
            ProgressEvent::new(
                PipelineStage::ExtractActs,
                format!("Acts converted to JSON for Chapter {}", number),
            )
            .with_chapter(number),
        );

        // Prose
        let mut buffer = ContinuityBuffer::new();
        for (key, act) in acts.iter() {
            let act_number = key.number();
            self.record(
                ProgressEvent::new(
                    PipelineStage::WriteAct,
                    format!("Writing Act {} for Chapter {}", act_number, number),
                )
                .with_chapter(number)
                .with_act(act_number),
            );

            let act_vars = TemplateVars::new()
                .with("blueprint", blueprint)
                .with("story_prompt", prompt)
                .with("chapter_description", description)
                .with("act_description", act.description())
                .with("writing_advice", act.writing_advice())
                .with("act_number", act_number)
                .with("chapter_number", number);
            let act_prompt = self
                .act_prompt(&act_vars, &buffer)
                .map_err(|e| self.abort(e.with_chapter(number).with_act(act_number)))?;

            let text = ActText::new(
                self.generate(PipelineStage::WriteAct, &act_prompt)
                    .await
                    .map_err(|e| {
                        self.abort(
                            PipelineError::new(PipelineStage::WriteAct, e)
                                .with_chapter(number)
                                .with_act(act_number),
                        )
                    })?,
            );
            self.record(
                ProgressEvent::new(
                    PipelineStage::WriteAct,
                    format!(
                        "Act {} content for Chapter {}: {}",
                        act_number,
                        number,
                        preview(text.as_str(), *self.pipeline.preview_chars())
                    ),
                )
                .with_chapter(number)
                .with_act(act_number),
            );
            if live {
                self.display.act_written(number, key, &text);
            }
            buffer.append(text);
        }

        let written = buffer.len();
        let acts: [ActText; 3] = buffer.into_acts().try_into().map_err(|_| {
            self.abort(
                PipelineError::new(
                    PipelineStage::FinalizeChapter,
                    ExtractionError::new(ExtractionErrorKind::MissingAct(format!(
                        "act-{}",
                        written + 1
                    ))),
                )
                .with_chapter(number),
            )
        })?;
        let text = ChapterText::assemble(title.as_str(), &acts);
        self.record(
            ProgressEvent::new(
                PipelineStage::FinalizeChapter,
                format!("Chapter {} complete", number),
            )
            .with_chapter(number),
        );

        Ok(ChapterDraft { number, acts, text })
    }

    /// The write-act prompt, with the continuation context once the chapter
    /// has prose.
    fn act_prompt(
        &self,
        vars: &TemplateVars,
        buffer: &ContinuityBuffer,
    ) -> Result<String, PipelineError> {
        let mut prompt = self.render(PipelineStage::WriteAct, TemplateId::WriteAct, vars)?;
        if !buffer.is_empty() {
            let continuation = self.render(
                PipelineStage::WriteAct,
                TemplateId::ContinueAct,
                &vars.clone().with("previous_text", buffer.snapshot()),
            )?;
            prompt.push('\n');
            prompt.push_str(&continuation);
        }
        Ok(prompt)
    }

    fn render(
        &self,
        stage: PipelineStage,
        id: TemplateId,
        vars: &TemplateVars,
    ) -> Result<String, PipelineError> {
        self.templates
            .render(id, vars)
            .map_err(|e| PipelineError::new(stage, e))
    }

    /// One creative generation call under the generation retry policy.
    async fn generate(&self, stage: PipelineStage, prompt: &str) -> StoryloomResult<String> {
        let driver = &self.driver;
        let label = stage.to_string();
        execute_with_retry(&self.retry.generation, &label, move || async move {
            driver.complete(prompt).await
        })
        .await
    }

    fn record(&self, event: ProgressEvent) {
        self.events.record(event);
    }

    /// Log the failure and convert it for the caller.
    fn abort(&self, error: PipelineError) -> StoryloomError {
        tracing::error!(
            stage = %error.stage,
            chapter = ?error.chapter,
            act = ?error.act,
            error = %error.cause(),
            "Story generation failed"
        );

        let mut event = ProgressEvent::new(
            error.stage,
            format!("Story generation failed during {}: {}", error.stage, error.cause()),
        );
        if let Some(chapter) = error.chapter {
            event = event.with_chapter(chapter);
        }
        if let Some(act) = error.act {
            event = event.with_act(act);
        }
        self.events.record(event);

        error.into()
    }
}
