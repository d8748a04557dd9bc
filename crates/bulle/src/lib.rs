//! Bulle: comic-script generation with tolerant parsing of model answers.
//!
//! This crate re-exports the workspace under one name:
//!
//! - data model, configuration and tracing setup from `bulle_core`
//! - errors from `bulle_error`
//! - the [`BulleDriver`] seam from `bulle_interface`
//! - the tolerant parsers from `bulle_parse`
//! - prompt builders, [`Stages`] and [`ChapterPipeline`] from `bulle_pipeline`
//! - the axum surface from `bulle_server`
//! - the Gemini backend from `bulle_models` (feature `gemini`)
//!
//! # Example
//!
//! ```
//! use bulle::{PromptDialect, parse_prompts, parse_storyboard};
//!
//! let panels = parse_storyboard("PAGE 1\nCASE 1\nDESCRIPTION: Un port.").unwrap();
//! assert_eq!(panels[0].description, "Un port.");
//!
//! let prompts = parse_prompts("PAGE 1 - CASE 1 PROMPT: a harbor", PromptDialect::PagePanel).unwrap();
//! assert_eq!(prompts[0].prompt, "a harbor");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use bulle_core::*;
pub use bulle_error::*;
pub use bulle_interface::*;
pub use bulle_parse::*;
pub use bulle_pipeline::*;
pub use bulle_server::{
    AppError, AppResult, AppState, OutlineResponse, ParseRequest, PromptsResponse,
    ScenarioResponse, SharedDriver, StoryboardResponse, create_router, error_code, serve,
};

#[cfg(feature = "gemini")]
pub use bulle_models::*;
