//! Stage orchestration for Bulle.
//!
//! A comic script is generated in four stages: outline, chapter detail,
//! storyboard and image prompts. This crate builds each stage's prompt,
//! calls a [`BulleDriver`](bulle_interface::BulleDriver) under a bounded wait,
//! and hands the answer to the matching parser of `bulle_parse`.
//!
//! - [`Stages`] runs one stage at a time
//! - [`ChapterPipeline`] chains detail, storyboard and prompts per chapter,
//!   several chapters at once

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chapters;
mod prompts;
mod stages;
mod template;

pub use chapters::{ChapterPipeline, ChapterRun, StageFailure};
pub use prompts::{
    build_chapter_detail_prompt, build_outline_prompt, build_prompts_prompt,
    build_storyboard_prompt, output_format, render_storyboard_context,
};
pub use stages::{Stage, Stages};
pub use template::{PromptTemplate, RULE};
