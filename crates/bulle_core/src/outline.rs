//! Story outline records.

use serde::{Deserialize, Serialize};

/// Title used when no global title could be found.
pub const NO_TITLE: &str = "N/A";

/// Suffix marking a chapter whose title line never appeared.
pub const MISSING_TITLE_SUFFIX: &str = "(Titre Manquant)";

/// Global title plus the chapter list of a planned comic.
///
/// # Examples
///
/// ```
/// use bulle_core::{Chapter, Outline};
///
/// let outline = Outline {
///     title: "Le Réveil".to_string(),
///     chapters: vec![Chapter::new(1, "Départ", "Le héros part.")],
/// };
/// assert_eq!(outline.chapter(1).map(|c| c.title.as_str()), Some("Départ"));
/// assert!(outline.chapter(2).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Global work title, `"N/A"` when absent
    pub title: String,
    /// Chapters sorted by ascending number, unique by number
    pub chapters: Vec<Chapter>,
}

impl Outline {
    /// Look up a chapter by number.
    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    /// Whether a global title was found.
    pub fn has_title(&self) -> bool {
        self.title != NO_TITLE
    }
}

/// One chapter of an outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter number, not assumed contiguous
    #[serde(rename = "chapter")]
    pub number: u32,
    /// Chapter title, or the missing-title sentinel
    pub title: String,
    /// Short summary, possibly empty
    #[serde(default)]
    pub summary: String,
}

impl Chapter {
    /// Create a chapter record.
    pub fn new(number: u32, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            summary: summary.into(),
        }
    }

    /// Sentinel title for chapter `number` when only its summary was found.
    pub fn missing_title(number: u32) -> String {
        format!("Chapitre {number} {MISSING_TITLE_SUFFIX}")
    }

    /// Whether this chapter carries the missing-title sentinel.
    pub fn is_title_missing(&self) -> bool {
        self.title == Self::missing_title(self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_serializes_number_as_chapter() {
        let json = serde_json::to_value(Chapter::new(3, "Nuit", "")).unwrap();
        assert_eq!(json["chapter"], 3);
        assert_eq!(json["title"], "Nuit");
        assert_eq!(json["summary"], "");
    }

    #[test]
    fn test_missing_title_sentinel() {
        let chapter = Chapter::new(4, Chapter::missing_title(4), "Résumé seul.");
        assert_eq!(chapter.title, "Chapitre 4 (Titre Manquant)");
        assert!(chapter.is_title_missing());
    }
}
