//! Caller-supplied context for each generation stage.
//!
//! Fields default to empty when absent from a request body so that
//! [`validate`](StoryRequest::validate) can name the missing field instead of
//! failing deserialization.

use crate::{PromptDialect, StoryboardPanel};
use bulle_error::ValidationError;
use serde::{Deserialize, Serialize};

fn require(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(())
}

fn require_number(field: &str, value: Option<u32>) -> Result<u32, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

/// Creative brief of the whole comic, input of the outline stage.
///
/// # Examples
///
/// ```
/// use bulle_core::StoryRequest;
///
/// let mut story = StoryRequest::new("dragon, exil", "fantasy", "aquarelle", "sombre");
/// assert!(story.validate().is_ok());
///
/// story.tone = "  ".to_string();
/// let err = story.validate().unwrap_err();
/// assert_eq!(err.field, "tone");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryRequest {
    /// Idea or keywords
    pub keywords: String,
    /// Genre
    pub genre: String,
    /// Target visual style
    pub style: String,
    /// Tone
    pub tone: String,
    /// Additional details (characters, settings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl StoryRequest {
    /// Brief without additional details.
    pub fn new(
        keywords: impl Into<String>,
        genre: impl Into<String>,
        style: impl Into<String>,
        tone: impl Into<String>,
    ) -> Self {
        Self {
            keywords: keywords.into(),
            genre: genre.into(),
            style: style.into(),
            tone: tone.into(),
            details: None,
        }
    }

    /// Check that keywords, genre, style and tone are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("keywords", &self.keywords)?;
        require("genre", &self.genre)?;
        require("style", &self.style)?;
        require("tone", &self.tone)
    }

    /// Additional details, if non-blank.
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Input of the chapter detail stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChapterDetailRequest {
    /// Creative brief
    #[serde(flatten)]
    pub story: StoryRequest,
    /// Global title from the outline
    pub global_title: String,
    /// Number of chapters in the outline
    pub total_chapters: Option<u32>,
    /// Chapter to detail
    pub chapter_number: Option<u32>,
    /// Title of that chapter
    pub chapter_title: String,
    /// Summary of that chapter, used as a guide
    pub chapter_summary: Option<String>,
}

impl ChapterDetailRequest {
    /// Check the brief, the global title and the chapter number and title.
    pub fn validate(&self) -> Result<u32, ValidationError> {
        self.story.validate()?;
        require("globalTitle", &self.global_title)?;
        let number = require_number("chapterNumber", self.chapter_number)?;
        require("chapterTitle", &self.chapter_title)?;
        Ok(number)
    }
}

/// Input of the storyboard stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoryboardRequest {
    /// Target visual style
    pub style: String,
    /// Genre
    pub genre: Option<String>,
    /// Tone
    pub tone: Option<String>,
    /// Additional details
    pub details: Option<String>,
    /// Global title
    pub global_title: Option<String>,
    /// Chapter the scenario belongs to
    pub chapter_number: Option<u32>,
    /// Title of that chapter
    pub chapter_title: Option<String>,
    /// Output of the chapter detail stage
    pub detailed_scenario_text: String,
}

impl StoryboardRequest {
    /// Check the scenario text, the chapter number and the style.
    pub fn validate(&self) -> Result<u32, ValidationError> {
        require("detailedScenarioText", &self.detailed_scenario_text)?;
        let number = require_number("chapterNumber", self.chapter_number)?;
        require("style", &self.style)?;
        Ok(number)
    }
}

/// Input of the image prompt stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromptsRequest {
    /// Target visual style
    pub style: String,
    /// Genre
    pub genre: Option<String>,
    /// Tone
    pub tone: Option<String>,
    /// Character and setting reference details
    pub details: Option<String>,
    /// Global title
    pub global_title: Option<String>,
    /// Chapter the storyboard belongs to
    pub chapter_number: Option<u32>,
    /// Title of that chapter
    pub chapter_title: Option<String>,
    /// Storyboard panels of the chapter
    #[serde(alias = "storyboardDataForChapter")]
    pub storyboard: Vec<StoryboardPanel>,
    /// Marker grammar to request, the configured one when unset
    pub dialect: Option<PromptDialect>,
}

impl PromptsRequest {
    /// Check the style and that the storyboard has at least one panel.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("style", &self.style)?;
        if self.storyboard.is_empty() {
            return Err(ValidationError::new(
                "storyboard",
                "Le storyboard doit contenir au moins une case.",
            ));
        }
        Ok(())
    }
}
