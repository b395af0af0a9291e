//! Command-line interface module.
//!
//! This module provides the CLI structure and the story command handler for
//! the storyloom binary.

mod commands;
mod run;

pub use commands::Cli;
pub use run::{RunOverrides, resolve_prompt, run_story};
