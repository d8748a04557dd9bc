//! Storyboard parsing: per page and panel, description and camera framing.

use crate::scan::{TagTable, is_separator, lines, number, text};
use bulle_core::{MISSING_DESCRIPTION, PageFallback, ParseFailure, ParseResult, StoryboardPanel};
use regex::Captures;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

static STORYBOARD_TAGS: LazyLock<TagTable<StoryboardScan>> = LazyLock::new(|| {
    TagTable::new()
        .rule("page", r"(?i)^PAGE\s+(\d+)", StoryboardScan::on_page)
        .rule(
            "panel",
            r"(?i)^(?:CASE|PANEL)\s+(\d+)\s*[:.)\-]?\s*(.*)",
            StoryboardScan::on_panel,
        )
        .rule(
            "description",
            r"(?i)^(?:DESCRIPTION VISUELLE ENRICHIE|DESCRIPTION VISUELLE|DESCRIPTION)\s*:\s*(.*)",
            StoryboardScan::on_description,
        )
        .rule(
            "shot_type",
            r"(?i)^(?:TYPE DE PLAN|TYPE PLAN|PLAN|SHOT TYPE)\s*:\s*(.*)",
            StoryboardScan::on_shot_type,
        )
        .rule(
            "angle",
            r"(?i)^(?:ANGLE DE CAM[ÉE]RA|CAMERA ANGLE|ANGLE)\s*:\s*(.*)",
            StoryboardScan::on_angle,
        )
        .rule(
            "notes",
            r"(?i)^(?:NOTES|NOTE)\s*:\s*(.*)",
            StoryboardScan::on_notes,
        )
});

fn append(field: &mut Option<String>, value: &str) {
    if value.is_empty() {
        return;
    }
    match field {
        Some(existing) => {
            existing.push('\n');
            existing.push_str(value);
        }
        None => *field = Some(value.to_string()),
    }
}

fn overwrite(field: &mut Option<String>, value: &str) {
    if !value.is_empty() {
        *field = Some(value.to_string());
    }
}

/// Fields collected for the open panel.
#[derive(Debug, Default)]
struct PanelDraft {
    description: Option<String>,
    shot_type: Option<String>,
    angle: Option<String>,
    notes: Option<String>,
}

impl PanelDraft {
    fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.shot_type.is_none()
            && self.angle.is_none()
            && self.notes.is_none()
    }

    fn into_panel(self, page: u32, panel: u32) -> StoryboardPanel {
        let description = self.description.unwrap_or_else(|| {
            warn!(page, panel, "Panel has no description");
            MISSING_DESCRIPTION.to_string()
        });
        StoryboardPanel {
            page,
            panel,
            description,
            shot_type: self.shot_type,
            angle: self.angle,
            notes: self.notes,
        }
    }
}

fn merge(existing: &mut StoryboardPanel, repeat: StoryboardPanel) {
    if existing.description == MISSING_DESCRIPTION {
        existing.description = repeat.description;
    } else if repeat.description != MISSING_DESCRIPTION {
        existing.description.push('\n');
        existing.description.push_str(&repeat.description);
    }
    if repeat.shot_type.is_some() {
        existing.shot_type = repeat.shot_type;
    }
    if repeat.angle.is_some() {
        existing.angle = repeat.angle;
    }
    if let Some(notes) = repeat.notes {
        append(&mut existing.notes, &notes);
    }
}

#[derive(Debug)]
struct StoryboardScan {
    fallback: PageFallback,
    /// Most recent `PAGE n` marker
    page: Option<u32>,
    /// Open panel, if any
    panel: Option<u32>,
    draft: PanelDraft,
    panels: Vec<StoryboardPanel>,
    /// First panel found under `PAGE 0` with the strict policy
    orphan: Option<u32>,
}

impl StoryboardScan {
    fn new(fallback: PageFallback) -> Self {
        Self {
            fallback,
            page: None,
            panel: None,
            draft: PanelDraft::default(),
            panels: Vec::new(),
            orphan: None,
        }
    }

    fn on_page(&mut self, caps: &Captures<'_>) {
        let Some(page) = number(caps, 1) else {
            warn!(line = &caps[0], "Page number out of range, line ignored");
            return;
        };
        self.flush();
        debug!(page, "Page marker");
        self.page = Some(page);
        self.panel = None;
    }

    fn on_panel(&mut self, caps: &Captures<'_>) {
        let Some(panel) = number(caps, 1) else {
            warn!(line = &caps[0], "Panel number out of range, line ignored");
            return;
        };
        self.flush();
        debug!(panel, "Panel marker");
        self.panel = Some(panel);
        let inline = text(caps, 2);
        if !inline.is_empty()
            && let Some(draft) = self.open_draft(&caps[0])
        {
            append(&mut draft.description, inline);
        }
    }

    /// Draft of the open panel, `None` until both a page and a panel marker
    /// were seen.
    fn open_draft(&mut self, line: &str) -> Option<&mut PanelDraft> {
        if self.page.is_none() || self.panel.is_none() {
            debug!(line, "Ignoring line outside page/panel");
            return None;
        }
        Some(&mut self.draft)
    }

    fn on_description(&mut self, caps: &Captures<'_>) {
        if let Some(draft) = self.open_draft(&caps[0]) {
            append(&mut draft.description, text(caps, 1));
        }
    }

    fn on_shot_type(&mut self, caps: &Captures<'_>) {
        if let Some(draft) = self.open_draft(&caps[0]) {
            overwrite(&mut draft.shot_type, text(caps, 1));
        }
    }

    fn on_angle(&mut self, caps: &Captures<'_>) {
        if let Some(draft) = self.open_draft(&caps[0]) {
            overwrite(&mut draft.angle, text(caps, 1));
        }
    }

    fn on_notes(&mut self, caps: &Captures<'_>) {
        if let Some(draft) = self.open_draft(&caps[0]) {
            append(&mut draft.notes, text(caps, 1));
        }
    }

    /// Untagged lines are free-text description.
    fn on_untagged(&mut self, line: &str) {
        if is_separator(line) {
            return;
        }
        if let Some(draft) = self.open_draft(line) {
            append(&mut draft.description, line);
        }
    }

    /// Page of the panel being flushed. `PAGE 0` counts as no page.
    fn resolve_page(&mut self, panel: u32) -> Option<u32> {
        if let Some(page) = self.page.filter(|page| *page > 0) {
            return Some(page);
        }
        match self.fallback {
            PageFallback::Lenient => {
                let page = self.panels.last().map_or(1, |previous| previous.page);
                warn!(panel, page, "Panel under page 0, assuming page");
                Some(page)
            }
            PageFallback::Strict => {
                warn!(panel, "Panel under page 0");
                self.orphan.get_or_insert(panel);
                None
            }
        }
    }

    /// Emit the open panel if it holds any field.
    fn flush(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        let Some(panel) = self.panel else {
            return;
        };
        if draft.is_empty() {
            return;
        }
        let Some(page) = self.resolve_page(panel) else {
            return;
        };
        let record = draft.into_panel(page, panel);
        match self.panels.iter_mut().find(|p| p.key() == record.key()) {
            Some(existing) => {
                warn!(page, panel, "Panel repeated, merging into first occurrence");
                merge(existing, record);
            }
            None => self.panels.push(record),
        }
    }
}

/// Storyboard response parser.
///
/// Recognized tags, case-insensitive:
///
/// | field | tags |
/// |---|---|
/// | description | `DESCRIPTION VISUELLE ENRICHIE`, `DESCRIPTION VISUELLE`, `DESCRIPTION` |
/// | shot type | `TYPE DE PLAN`, `TYPE PLAN`, `PLAN`, `SHOT TYPE` |
/// | angle | `ANGLE DE CAMÉRA`, `CAMERA ANGLE`, `ANGLE` |
/// | notes | `NOTES`, `NOTE` |
///
/// Description and notes accumulate line by line; shot type and angle keep
/// the last value. Untagged lines inside a panel extend its description.
///
/// # Examples
///
/// ```
/// use bulle_core::PageFallback;
/// use bulle_parse::StoryboardParser;
///
/// let text = "PAGE 1\nCASE 1\nUn phare.\nPLAN: Large\nCASE 2: La mer.";
/// let panels = StoryboardParser::default().parse(text).unwrap();
/// assert_eq!(panels.len(), 2);
/// assert_eq!(panels[0].shot_type.as_deref(), Some("Large"));
/// assert_eq!(panels[1].description, "La mer.");
///
/// let strict = StoryboardParser::with_fallback(PageFallback::Strict);
/// assert!(strict.parse("PAGE 0\nCASE 1\nUn phare.").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoryboardParser {
    fallback: PageFallback,
}

impl StoryboardParser {
    /// Parser applying `fallback` to panels under a `PAGE 0` marker.
    pub fn with_fallback(fallback: PageFallback) -> Self {
        Self { fallback }
    }

    /// Page fallback policy in use.
    pub fn fallback(&self) -> PageFallback {
        self.fallback
    }

    /// Parse a storyboard response.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] holding `text` verbatim when no panel was
    /// found, or, under [`PageFallback::Strict`], when a panel has no usable
    /// page number.
    #[instrument(skip(self, text), fields(text_len = text.len(), fallback = %self.fallback))]
    pub fn parse(&self, text: &str) -> ParseResult<Vec<StoryboardPanel>> {
        let mut scan = StoryboardScan::new(self.fallback);
        for line in lines(text) {
            if STORYBOARD_TAGS.dispatch(&mut scan, &line).is_none() {
                scan.on_untagged(&line);
            }
        }
        scan.flush();

        if let Some(panel) = scan.orphan {
            return Err(ParseFailure::new(
                text,
                format!("Parsing failed: panel {panel} has no page number."),
            ));
        }
        if scan.panels.is_empty() {
            warn!(text_len = text.len(), "No panels found in storyboard");
            return Err(ParseFailure::new(text, "Parsing failed: No panels parsed."));
        }

        debug!(panels = scan.panels.len(), "Storyboard parsed");
        Ok(scan.panels)
    }
}

/// Parse a storyboard response with the lenient page fallback.
///
/// # Errors
///
/// Returns a [`ParseFailure`] holding `text` verbatim when no panel was found.
pub fn parse_storyboard(text: &str) -> ParseResult<Vec<StoryboardPanel>> {
    StoryboardParser::default().parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_before_panel_are_dropped() {
        let panels = parse_storyboard("Voici le storyboard.\nPAGE 1\nIntro.\nCASE 1\nUne rue.").unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].description, "Une rue.");
    }

    #[test]
    fn test_separators_are_not_description() {
        let panels = parse_storyboard("PAGE 1\nCASE 1\nUne rue.\n---\nCASE 2\nUn toit.").unwrap();
        assert_eq!(panels[0].description, "Une rue.");
    }

    #[test]
    fn test_shot_type_last_wins_notes_accumulate() {
        let text = "PAGE 2\nPANEL 3\nPLAN: Moyen\nTYPE DE PLAN: Gros plan\nNOTE: Nuit\nNOTES: Pluie";
        let panels = parse_storyboard(text).unwrap();
        assert_eq!(panels[0].shot_type.as_deref(), Some("Gros plan"));
        assert_eq!(panels[0].notes.as_deref(), Some("Nuit\nPluie"));
        assert_eq!(panels[0].key(), (2, 3));
    }

    #[test]
    fn test_missing_description_sentinel() {
        let panels = parse_storyboard("PAGE 1\nCASE 1\nANGLE: Plongée").unwrap();
        assert_eq!(panels[0].description, MISSING_DESCRIPTION);
        assert_eq!(panels[0].angle.as_deref(), Some("Plongée"));
    }

    #[test]
    fn test_empty_panel_is_not_emitted() {
        let panels = parse_storyboard("PAGE 1\nCASE 1\nCASE 2\nUn toit.").unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].panel, 2);
    }

    #[test]
    fn test_repeated_panel_is_merged() {
        let text = "PAGE 1\nCASE 1\nUne rue.\nPAGE 1\nCASE 1\nUn chat.\nANGLE: Normal";
        let panels = parse_storyboard(text).unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].description, "Une rue.\nUn chat.");
        assert_eq!(panels[0].angle.as_deref(), Some("Normal"));
    }

    #[test]
    fn test_lenient_fallback_reuses_previous_page() {
        let text = "PAGE 3\nCASE 1\nUne rue.\nPAGE 0\nCASE 2\nUn toit.";
        let panels = parse_storyboard(text).unwrap();
        assert_eq!(panels[1].key(), (3, 2));
    }

    #[test]
    fn test_panel_without_page_is_dropped() {
        let failure = parse_storyboard("CASE 4\nUn toit.").unwrap_err();
        assert_eq!(failure.raw_text, "CASE 4\nUn toit.");

        let panels = parse_storyboard("CASE 1: Une cave.\nPAGE 2\nCASE 1\nUn toit.").unwrap();
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].key(), (2, 1));
        assert_eq!(panels[0].description, "Un toit.");
    }

    #[test]
    fn test_lenient_fallback_defaults_to_page_one() {
        let panels = parse_storyboard("PAGE 0\nCASE 4\nUn toit.").unwrap();
        assert_eq!(panels[0].key(), (1, 4));
    }

    #[test]
    fn test_strict_fallback_fails_loudly() {
        let parser = StoryboardParser::with_fallback(PageFallback::Strict);
        let failure = parser.parse("PAGE 1\nCASE 1\nUne rue.\nPAGE 0\nCASE 2\nUn toit.").unwrap_err();
        assert!(failure.parsing_error.contains("panel 2"));
    }
}
