//! Chapter detail passthrough.

use bulle_core::{ChapterDetail, ParseFailure, ParseResult};
use tracing::{debug, instrument, warn};

/// Keep a chapter detail response as text.
///
/// The script is not broken into pages and panels: the storyboard stage reads
/// it as a whole. Only surrounding whitespace is removed.
///
/// # Errors
///
/// Returns a [`ParseFailure`] when the response is blank.
///
/// # Examples
///
/// ```
/// use bulle_parse::parse_chapter_detail;
///
/// let detail = parse_chapter_detail(3, "\nPAGE 1\nCase 1: Un quai.\n").unwrap();
/// assert_eq!(detail.chapter, 3);
/// assert_eq!(detail.text, "PAGE 1\nCase 1: Un quai.");
/// assert!(parse_chapter_detail(3, "  \n ").is_err());
/// ```
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_chapter_detail(chapter: u32, text: &str) -> ParseResult<ChapterDetail> {
    let detail = ChapterDetail::new(chapter, text);
    if detail.is_empty() {
        warn!(chapter, "Chapter detail response is blank");
        return Err(ParseFailure::new(
            text,
            format!("Parsing failed: empty script for chapter {chapter}."),
        ));
    }
    debug!(chapter, chars = detail.text.chars().count(), "Chapter detail kept");
    Ok(detail)
}
