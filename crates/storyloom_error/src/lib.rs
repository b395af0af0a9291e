//! Error types for the Storyloom library.
//!
//! This crate provides the error taxonomy shared by every stage of the story
//! pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! [`PipelineError`] wraps any of the above with the stage, chapter and act
//! where the run was aborted.
//!
//! # Examples
//!
//! ```
//! use storyloom_error::{ServiceError, ServiceErrorKind, StoryloomResult};
//!
//! fn call_service() -> StoryloomResult<String> {
//!     Err(ServiceError::new(ServiceErrorKind::EmptyResponse))?
//! }
//!
//! match call_service() {
//!     Ok(text) => println!("Got: {}", text),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod extraction;
mod pipeline;
mod retry;
mod service;
mod template;

pub use config::ConfigError;
pub use error::{StoryloomError, StoryloomErrorKind, StoryloomResult};
pub use extraction::{ExtractionError, ExtractionErrorKind};
pub use pipeline::{PipelineError, PipelineStage};
pub use retry::RetryableError;
pub use service::{ServiceError, ServiceErrorKind};
pub use template::{TemplateError, TemplateErrorKind};
