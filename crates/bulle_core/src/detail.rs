//! Chapter detail passthrough.

use serde::{Deserialize, Serialize};

/// Detailed page/panel script of one chapter, kept as opaque text.
///
/// # Examples
///
/// ```
/// use bulle_core::ChapterDetail;
///
/// let detail = ChapterDetail::new(2, "\n\nPAGE 1\nCase 1: Une rue.\n");
/// assert_eq!(detail.text, "PAGE 1\nCase 1: Une rue.");
/// assert!(!detail.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDetail {
    /// Chapter number
    pub chapter: u32,
    /// Generated script with surrounding whitespace trimmed
    pub text: String,
}

impl ChapterDetail {
    /// Keep `text` verbatim apart from surrounding whitespace.
    pub fn new(chapter: u32, text: impl AsRef<str>) -> Self {
        Self {
            chapter,
            text: text.as_ref().trim().to_string(),
        }
    }

    /// Whether the script is blank.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
