//! Core data types for the Storyloom story generation pipeline.
//!
//! This crate provides the request and response types exchanged with a
//! generation service, and the story artifacts produced by each stage of a run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod act;
mod assembly;
mod chapter;
mod input;
mod message;
mod ordered;
mod output;
mod request;
mod role;
mod story;

pub use act::{ActKey, ActOutline, ActSet, ActText};
pub use assembly::{ChapterText, FullStory, join_acts};
pub use chapter::{Chapter, ChapterMap};
pub use input::Input;
pub use message::{Message, MessageBuilder};
pub use ordered::OrderedEntries;
pub use output::Output;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use story::{Blueprint, StoryPrompt, StructureChoice, StructureSummary};
