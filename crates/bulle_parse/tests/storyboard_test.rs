//! Acceptance tests for storyboard parsing.

use bulle_core::{PageFallback, StoryboardPanel};
use bulle_parse::{StoryboardParser, parse_storyboard};

fn render(panels: &[StoryboardPanel]) -> String {
    let mut out = String::new();
    let mut page = None;
    for panel in panels {
        if page != Some(panel.page) {
            out.push_str(&format!("PAGE {}\n", panel.page));
            page = Some(panel.page);
        }
        out.push_str(&format!("CASE {}\n", panel.panel));
        for line in panel.description.lines() {
            out.push_str(&format!("DESCRIPTION VISUELLE ENRICHIE: {line}\n"));
        }
        if let Some(shot) = &panel.shot_type {
            out.push_str(&format!("TYPE DE PLAN: {shot}\n"));
        }
        if let Some(angle) = &panel.angle {
            out.push_str(&format!("ANGLE: {angle}\n"));
        }
        for line in panel.notes.iter().flat_map(|notes| notes.lines()) {
            out.push_str(&format!("NOTES: {line}\n"));
        }
        out.push('\n');
    }
    out
}

#[test]
fn test_single_fully_tagged_panel() {
    let text = "PAGE 1\nCASE 1\nDESCRIPTION VISUELLE ENRICHIE: Un homme marche.\nTYPE DE PLAN: Plan large\nANGLE: Normal\nNOTES: Aucune";
    let panels = parse_storyboard(text).unwrap();

    assert_eq!(
        panels,
        vec![StoryboardPanel {
            page: 1,
            panel: 1,
            description: "Un homme marche.".to_string(),
            shot_type: Some("Plan large".to_string()),
            angle: Some("Normal".to_string()),
            notes: Some("Aucune".to_string()),
        }]
    );
}

#[test]
fn test_panels_grouped_by_page() {
    let text = "PAGE 1\nCASE 1\nUne gare.\nCASE 2\nUn train.\n\nPAGE 2\nCASE 1\nUn quai vide.\nANGLE DE CAMÉRA: Plongée";
    let panels = parse_storyboard(text).unwrap();

    let keys: Vec<(u32, u32)> = panels.iter().map(StoryboardPanel::key).collect();
    assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1)]);
    assert!(panels.iter().all(|p| !p.description.is_empty()));
    assert_eq!(panels[2].angle.as_deref(), Some("Plongée"));
}

#[test]
fn test_untagged_lines_become_description() {
    let text = "PAGE 1\nPANEL 1\nLa pluie tombe sur la ville.\nUn chat traverse.\nPLAN: Moyen";
    let panels = parse_storyboard(text).unwrap();
    assert_eq!(panels[0].description, "La pluie tombe sur la ville.\nUn chat traverse.");
    assert_eq!(panels[0].shot_type.as_deref(), Some("Moyen"));
}

#[test]
fn test_tag_format_round_trips() {
    let text = "PAGE 1\nCASE 1\nDESCRIPTION: Un phare.\nLa mer est grise.\nTYPE PLAN: Large\nANGLE: Contre-plongée\nNOTE: Aube\nCASE 2\nDESCRIPTION: Un bateau.\nPAGE 2\nCASE 1\nDESCRIPTION: Un port.\nNOTES: Brume\nNOTES: Cris de mouettes";
    let first = parse_storyboard(text).unwrap();
    let second = parse_storyboard(&render(&first)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_plain_sentence_is_soft_failure() {
    let text = "Bonjour, ceci est juste une phrase.";
    let failure = parse_storyboard(text).unwrap_err();
    assert_eq!(failure.raw_text, text);
    assert!(!failure.parsing_error.is_empty());
}

#[test]
fn test_empty_input_is_soft_failure() {
    assert!(parse_storyboard("").is_err());
}

#[test]
fn test_parser_is_reusable_across_calls() {
    let parser = StoryboardParser::with_fallback(PageFallback::Lenient);
    let first = parser.parse("PAGE 5\nCASE 1\nUn toit.").unwrap();
    let second = parser.parse("PAGE 0\nCASE 1\nUne cave.").unwrap();
    assert_eq!(first[0].page, 5);
    assert_eq!(second[0].page, 1);
}

#[test]
fn test_strict_and_lenient_agree_when_pages_are_explicit() {
    let text = "PAGE 1\nCASE 1\nUne gare.\nPAGE 2\nCASE 1\nUn train.";
    let lenient = StoryboardParser::with_fallback(PageFallback::Lenient).parse(text).unwrap();
    let strict = StoryboardParser::with_fallback(PageFallback::Strict).parse(text).unwrap();
    assert_eq!(lenient, strict);
}

#[test]
fn test_underscore_emphasis_markers() {
    let panels = parse_storyboard("__PAGE 2__\n__CASE 1__\nUne ruelle.").unwrap();
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].key(), (2, 1));
    assert_eq!(panels[0].description, "Une ruelle.");
}

#[test]
fn test_case_before_any_page_is_soft_failure() {
    let text = "CASE 4\nUn toit.";
    let failure = parse_storyboard(text).unwrap_err();
    assert_eq!(failure.raw_text, text);
}
