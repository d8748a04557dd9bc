//! Image prompt records.

use serde::{Deserialize, Serialize};

/// Image-generation prompt for one storyboard panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePrompt {
    /// Page number, 1 when the dialect has no page index
    pub page: u32,
    /// Panel number
    pub panel: u32,
    /// Prompt text, lines joined with `\n`
    pub prompt: String,
}

impl ImagePrompt {
    /// Create a prompt record.
    pub fn new(page: u32, panel: u32, prompt: impl Into<String>) -> Self {
        Self {
            page,
            panel,
            prompt: prompt.into(),
        }
    }

    /// Composite key of this prompt.
    pub fn key(&self) -> (u32, u32) {
        (self.page, self.panel)
    }
}
