//! Storyboard panel records.

use serde::{Deserialize, Serialize};

/// Description used for a panel that carried framing data but no description.
pub const MISSING_DESCRIPTION: &str = "Description manquante";

/// One visual unit of a chapter storyboard.
///
/// `(page, panel)` is unique within one parse result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardPanel {
    /// Page number
    pub page: u32,
    /// Panel number within the page
    pub panel: u32,
    /// Enriched visual description
    pub description: String,
    /// Suggested shot type
    #[serde(default)]
    pub shot_type: Option<String>,
    /// Suggested camera angle
    #[serde(default)]
    pub angle: Option<String>,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl StoryboardPanel {
    /// Composite key of this panel.
    pub fn key(&self) -> (u32, u32) {
        (self.page, self.panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_uses_camel_case_fields() {
        let panel = StoryboardPanel {
            page: 1,
            panel: 2,
            description: "Un homme marche.".to_string(),
            shot_type: Some("Plan large".to_string()),
            angle: None,
            notes: None,
        };
        let json = serde_json::to_value(&panel).unwrap();
        assert_eq!(json["shotType"], "Plan large");
        assert!(json["angle"].is_null());
        assert_eq!(panel.key(), (1, 2));
    }

    #[test]
    fn test_panel_deserializes_without_optional_fields() {
        let panel: StoryboardPanel =
            serde_json::from_str(r#"{"page":2,"panel":1,"description":"Ville"}"#).unwrap();
        assert_eq!(panel.shot_type, None);
        assert_eq!(panel.key(), (2, 1));
    }
}
