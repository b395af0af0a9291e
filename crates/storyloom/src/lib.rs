//! Storyloom - staged story generation
//!
//! Storyloom turns a one-line story idea into a complete multi-chapter story
//! by driving a text-generation service through dependent stages: structure
//! selection, blueprinting, chapter and act decomposition, and prose writing.
//!
//! # Features
//!
//! - **Staged pipeline**: Each stage feeds the next; acts within a chapter
//!   see the prose written before them
//! - **Validated structure**: Chapter and act lists are reformatted to JSON
//!   and checked before use
//! - **Resilience**: Bounded retry with backoff and request rate limiting
//! - **Layered configuration**: Bundled defaults, user files and an explicit file
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyloom::{OpenAICompatibleClient, StoryPipeline, StoryloomConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryloomConfig::load()?;
//!     let client = OpenAICompatibleClient::from_config(&config)?;
//!     let run = StoryPipeline::new(client)
//!         .with_config(&config)
//!         .run("A lonely lighthouse keeper discovers a message in a bottle")
//!         .await?;
//!     println!("{}", run.full_story());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `storyloom_error` - Error types
//! - `storyloom_core` - Request, response and story data types
//! - `storyloom_interface` - `StoryDriver` trait and output sinks
//! - `storyloom_rate_limit` - Configuration, retry and rate limiting
//! - `storyloom_models` - Generation service clients
//! - `storyloom_narrative` - Templates, extraction and the story pipeline
//!
//! This crate (`storyloom`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod terminal;

pub use terminal::{TerminalDisplay, TerminalProgress};

pub use storyloom_core::*;
pub use storyloom_error::*;
pub use storyloom_interface::*;
pub use storyloom_models::*;
pub use storyloom_narrative::*;
pub use storyloom_rate_limit::*;
