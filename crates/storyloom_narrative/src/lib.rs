//! Staged story generation pipeline for Storyloom.
//!
//! A run turns one story idea into a multi-chapter story through dependent
//! generation calls:
//!
//! 1. Choose and summarize a story structure
//! 2. Build a blueprint
//! 3. Extract the chapter list as validated JSON
//! 4. For each chapter, outline three acts and extract them as validated JSON
//! 5. Write each act, feeding earlier acts of the chapter back in as context
//! 6. Assemble the chapters into the full story
//!
//! # Example
//!
//! ```rust,ignore
//! use storyloom_models::OpenAICompatibleClient;
//! use storyloom_narrative::StoryPipeline;
//! use storyloom_rate_limit::StoryloomConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoryloomConfig::load()?;
//! let client = OpenAICompatibleClient::from_config(&config)?;
//! let pipeline = StoryPipeline::new(client).with_config(&config);
//!
//! let run = pipeline
//!     .run("A lonely lighthouse keeper discovers a message in a bottle")
//!     .await?;
//! println!("{}", run.full_story());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod continuity;
mod event_log;
mod extraction;
mod pipeline;
mod templates;

pub use continuity::ContinuityBuffer;
pub use event_log::{EventLog, preview};
pub use extraction::{
    ACTS_SCHEMA, CHAPTERS_SCHEMA, StructuredExtractor, extract_json, parse_acts, parse_chapters,
    parse_json, validate_acts, validate_chapter_title, validate_chapters,
};
pub use pipeline::{StoryPipeline, StoryRun};
pub use templates::{TemplateEngine, TemplateId, TemplateVars};
