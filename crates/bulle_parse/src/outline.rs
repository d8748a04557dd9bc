//! Outline parsing: global title plus chapter titles and summaries.

use crate::scan::{TagTable, is_separator, lines, number, text};
use bulle_core::{Chapter, NO_TITLE, Outline, ParseFailure, ParseResult};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

static GLOBAL_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:TITRE GLOBAL|GLOBAL TITLE)\s*:\s*(.*)").expect("valid regex")
});

static CHAPTER_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:CHAPITRE|CHAPTER|R[ÉE]SUM[ÉE]|SUMMARY)").expect("valid regex")
});

static OUTLINE_TAGS: LazyLock<TagTable<OutlineScan>> = LazyLock::new(|| {
    TagTable::new()
        .rule(
            "global_title",
            r"(?i)^(?:TITRE GLOBAL|GLOBAL TITLE)\s*:",
            OutlineScan::on_global_title,
        )
        .rule(
            "chapter_summary",
            r"(?i)^(?:R[ÉE]SUM[ÉE]\s+(?:DU\s+)?CHAPITRE|SUMMARY\s+CHAPTER|CHAPTER\s+SUMMARY)\s+(\d+)\s*:\s*(.*)",
            OutlineScan::on_summary,
        )
        .rule(
            "chapter_title",
            r"(?i)^(?:CHAPITRE|CHAPTER)\s+(\d+)\s*:\s*(.*)",
            OutlineScan::on_title,
        )
});

#[derive(Debug, Default)]
struct ChapterDraft {
    title: Option<String>,
    summary: String,
}

#[derive(Debug, Default)]
struct OutlineScan {
    chapters: BTreeMap<u32, ChapterDraft>,
    /// Chapter whose title was seen and whose summary is still open
    current: Option<u32>,
}

impl OutlineScan {
    fn on_global_title(&mut self, _caps: &Captures<'_>) {
        self.current = None;
    }

    fn on_title(&mut self, caps: &Captures<'_>) {
        let Some(num) = number(caps, 1) else {
            warn!(line = &caps[0], "Chapter number out of range, line ignored");
            return;
        };
        let title = text(caps, 2);
        let draft = self.chapters.entry(num).or_default();
        if !title.is_empty() {
            debug!(chapter = num, title, "Chapter title");
            draft.title = Some(title.to_string());
        }
        self.current = Some(num);
    }

    fn on_summary(&mut self, caps: &Captures<'_>) {
        let Some(num) = number(caps, 1) else {
            warn!(line = &caps[0], "Chapter number out of range, line ignored");
            return;
        };
        let draft = self.chapters.entry(num).or_default();
        if draft.title.is_none() {
            warn!(chapter = num, "Summary found before chapter title");
        }
        draft.summary = text(caps, 2).to_string();
        debug!(chapter = num, "Chapter summary");
        self.current = None;
    }

    /// Untagged line: completes the open chapter, else ignored.
    fn on_untagged(&mut self, line: &str) {
        if is_separator(line) {
            return;
        }
        let Some(draft) = self.current.and_then(|num| self.chapters.get_mut(&num)) else {
            debug!(line, "Ignoring line outside any chapter");
            return;
        };
        if draft.title.is_none() {
            draft.title = Some(line.to_string());
        } else if draft.summary.is_empty() {
            draft.summary = line.to_string();
        } else {
            draft.summary.push(' ');
            draft.summary.push_str(line);
        }
    }

    fn into_chapters(self) -> Vec<Chapter> {
        self.chapters
            .into_iter()
            .map(|(num, draft)| {
                let title = draft.title.unwrap_or_else(|| Chapter::missing_title(num));
                Chapter::new(num, title, draft.summary)
            })
            .collect()
    }
}

fn explicit_title(lines: &[String]) -> Option<String> {
    lines.iter().find_map(|line| {
        let caps = GLOBAL_TITLE.captures(line)?;
        let title = text(&caps, 1);
        (!title.is_empty()).then(|| title.to_string())
    })
}

/// Parse an outline response.
///
/// The global title comes from a `TITRE GLOBAL :` line anywhere in the text.
/// Chapters come from `CHAPITRE n : title` and `RÉSUMÉ CHAPITRE n : summary`
/// lines in any order; both update the same record. A chapter whose title
/// never appears is kept with the title `Chapitre n (Titre Manquant)`.
///
/// Without a `TITRE GLOBAL` line the first line stands in as the title, as
/// long as at least one chapter was found.
///
/// # Errors
///
/// Returns a [`ParseFailure`] holding `text` verbatim when neither a title
/// nor any chapter was found.
///
/// # Examples
///
/// ```
/// use bulle_parse::parse_outline;
///
/// let text = "RÉSUMÉ CHAPITRE 2 : Il fuit.\nCHAPITRE 1 : Départ\nCHAPITRE 2 : Fuite";
/// let outline = parse_outline(text).unwrap();
/// assert_eq!(outline.chapters[0].number, 1);
/// assert_eq!(outline.chapters[1].title, "Fuite");
/// assert_eq!(outline.chapters[1].summary, "Il fuit.");
///
/// assert!(parse_outline("Une phrase sans structure.").is_err());
/// ```
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_outline(text: &str) -> ParseResult<Outline> {
    let lines: Vec<String> = lines(text).collect();

    let mut scan = OutlineScan::default();
    for line in &lines {
        if OUTLINE_TAGS.dispatch(&mut scan, line).is_none() {
            scan.on_untagged(line);
        }
    }
    let chapters = scan.into_chapters();

    let title = explicit_title(&lines).or_else(|| {
        let first = lines.first().filter(|line| !CHAPTER_LIKE.is_match(line))?;
        if chapters.is_empty() {
            return None;
        }
        warn!(title = %first, "No global title marker, using first line");
        Some(first.clone())
    });

    if title.is_none() && chapters.is_empty() {
        warn!(text_len = text.len(), "No title or chapters found in outline");
        return Err(ParseFailure::new(
            text,
            "Parsing failed: No title or chapters found.",
        ));
    }

    debug!(chapters = chapters.len(), "Outline parsed");
    Ok(Outline {
        title: title.unwrap_or_else(|| NO_TITLE.to_string()),
        chapters,
    })
}
