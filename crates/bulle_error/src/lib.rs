//! Error types for the Bulle toolkit.
//!
//! This crate provides the foundation error types used throughout the Bulle workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! A response that could not be parsed is not an error here: parsers return
//! a soft failure value defined in `bulle_core`.
//!
//! # Examples
//!
//! ```
//! use bulle_error::{BulleResult, ValidationError};
//!
//! fn check_style(style: &str) -> BulleResult<()> {
//!     if style.trim().is_empty() {
//!         Err(ValidationError::missing("style"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_style("").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod generation;
mod http;
mod json;
mod validation;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{BulleError, BulleErrorKind, BulleResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use validation::ValidationError;
