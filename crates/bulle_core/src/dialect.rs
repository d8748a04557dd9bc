//! Parser policy switches shared by configuration, requests and parsers.

use serde::{Deserialize, Serialize};

/// Marker grammar of image-prompt responses.
///
/// # Examples
///
/// ```
/// use bulle_core::PromptDialect;
///
/// let dialect: PromptDialect = "page-panel".parse().unwrap();
/// assert_eq!(dialect, PromptDialect::PagePanel);
/// assert_eq!(PromptDialect::SingleIndex.to_string(), "single-index");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PromptDialect {
    /// `PANEL n PROMPT: ...`, every prompt on page 1
    SingleIndex,
    /// `PAGE n - CASE m PROMPT: ...`
    #[default]
    PagePanel,
}

/// What the storyboard parser does with a panel lacking an explicit page.
///
/// A panel lacks an explicit page when the `PAGE` marker before it reads `PAGE 0`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PageFallback {
    /// Reuse the page of the previously emitted panel, else page 1
    #[default]
    Lenient,
    /// Report the whole parse as failed
    Strict,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_and_parse_agree() {
        for dialect in PromptDialect::iter() {
            let parsed: PromptDialect = dialect.to_string().parse().unwrap();
            assert_eq!(parsed, dialect);
        }
        for fallback in PageFallback::iter() {
            let parsed: PageFallback = fallback.to_string().parse().unwrap();
            assert_eq!(parsed, fallback);
        }
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&PageFallback::Strict).unwrap();
        assert_eq!(json, "\"strict\"");
        let dialect: PromptDialect = serde_json::from_str("\"single-index\"").unwrap();
        assert_eq!(dialect, PromptDialect::SingleIndex);
    }
}
