//! Tolerant parsers for generated comic scripts.
//!
//! Language models rarely follow an output format exactly. Every parser here
//! scans the response line by line, classifies each line through an ordered
//! table of tag patterns, and keeps whatever structure it can recover:
//!
//! - [`parse_outline`] reads a global title and chapter titles and summaries
//! - [`parse_chapter_detail`] keeps a chapter script as text
//! - [`StoryboardParser`] reads page/panel descriptions and camera framing
//! - [`parse_prompts`] reads one image prompt per panel in either dialect
//!
//! When nothing at all can be recovered the parsers return a
//! [`ParseFailure`](bulle_core::ParseFailure) holding the raw text.
//! All parse state is local to one call.
//!
//! # Examples
//!
//! ```
//! use bulle_parse::parse_outline;
//!
//! let outline = parse_outline("TITRE GLOBAL : Le Réveil\nCHAPITRE 1 : Départ").unwrap();
//! assert_eq!(outline.title, "Le Réveil");
//! assert_eq!(outline.chapters[0].title, "Départ");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod detail;
mod outline;
mod prompts;
mod scan;
mod storyboard;

pub use detail::parse_chapter_detail;
pub use outline::parse_outline;
pub use prompts::{detect_dialect, parse_prompts};
pub use scan::normalize_line;
pub use storyboard::{StoryboardParser, parse_storyboard};
