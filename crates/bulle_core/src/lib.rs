//! Core data types for the Bulle comic-script toolkit.
//!
//! This crate provides the records every stage exchanges (outlines, storyboard
//! panels, image prompts), the soft parse-failure value, the request contexts
//! callers submit, generation request types and the layered configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod detail;
mod dialect;
mod outcome;
mod outline;
mod prompt;
mod request;
mod storyboard;
mod telemetry;

pub use config::{BulleConfig, GeminiConfig, GenerationDefaults, PipelineConfig, ServerConfig};
pub use context::{ChapterDetailRequest, PromptsRequest, StoryRequest, StoryboardRequest};
pub use detail::ChapterDetail;
pub use dialect::{PageFallback, PromptDialect};
pub use outcome::{ParseFailure, ParseOutcome, ParseResult};
pub use outline::{Chapter, Outline, MISSING_TITLE_SUFFIX, NO_TITLE};
pub use prompt::ImagePrompt;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse, GenerationParams};
pub use storyboard::{StoryboardPanel, MISSING_DESCRIPTION};
pub use telemetry::init_tracing;
