//! Trait definitions for the Storyloom story generation pipeline.
//!
//! This crate provides the generation service seam and the display and
//! progress sinks a run reports to.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod events;
mod sinks;
mod traits;

pub use events::ProgressEvent;
pub use sinks::{DisplaySink, NullDisplay, ProgressSink};
pub use traits::StoryDriver;
