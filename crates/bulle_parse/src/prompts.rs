//! Image prompt parsing, in either marker dialect.

use crate::scan::{TagTable, is_separator, lines, number, text};
use bulle_core::{ImagePrompt, ParseFailure, ParseResult, PromptDialect};
use regex::Captures;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

/// Inputs at most this many characters long may yield no prompt without failing.
const TRIVIAL_INPUT_CHARS: usize = 10;

/// Continuation lines must be longer than this.
const MIN_CONTINUATION_CHARS: usize = 5;

/// Anything starting like a page-panel marker, well formed or not.
const PAGE_PANEL_SHAPE: &str = r"(?i)^PAGE\s+\S+\s*-?\s*(?:CASE|PANEL)\b";

/// Anything starting like a single-index marker with a `PROMPT` label.
const SINGLE_INDEX_SHAPE: &str = r"(?i)^(?:PANEL|CASE)\s+\S+\s+PROMPT\b";

static SINGLE_INDEX_TAGS: LazyLock<TagTable<PromptScan>> = LazyLock::new(|| {
    TagTable::new()
        .rule(
            "marker",
            r"(?i)^(?:PANEL|CASE)\s+(\d+)\s+PROMPT\s*:\s*(.*)",
            PromptScan::on_single_index_marker,
        )
        .rule(
            "malformed_marker",
            r"(?i)^(?:PANEL|CASE)\s+(?:\d+|\S+\s+PROMPT\b)",
            PromptScan::on_malformed_marker,
        )
        .rule("foreign_marker", PAGE_PANEL_SHAPE, PromptScan::on_foreign_marker)
});

static PAGE_PANEL_TAGS: LazyLock<TagTable<PromptScan>> = LazyLock::new(|| {
    TagTable::new()
        .rule(
            "marker",
            r"(?i)^PAGE\s+(\d+)\s+-\s+(?:CASE|PANEL)\s+(\d+)\s+PROMPT\s*:\s*(.*)",
            PromptScan::on_page_panel_marker,
        )
        .rule("malformed_marker", PAGE_PANEL_SHAPE, PromptScan::on_malformed_marker)
        .rule("foreign_marker", SINGLE_INDEX_SHAPE, PromptScan::on_foreign_marker)
});

fn tags(dialect: PromptDialect) -> &'static TagTable<PromptScan> {
    match dialect {
        PromptDialect::SingleIndex => LazyLock::force(&SINGLE_INDEX_TAGS),
        PromptDialect::PagePanel => LazyLock::force(&PAGE_PANEL_TAGS),
    }
}

fn expected_format(dialect: PromptDialect) -> &'static str {
    match dialect {
        PromptDialect::SingleIndex => "PANEL X PROMPT: ...",
        PromptDialect::PagePanel => "PAGE X - CASE Y PROMPT: ...",
    }
}

/// Instruction echoes and rules never belong to a prompt.
fn is_boilerplate(line: &str) -> bool {
    let lower = line.to_lowercase();
    is_separator(line) || line.starts_with("==") || lower.contains("below") || lower.contains("english")
}

fn is_continuation(line: &str) -> bool {
    line.chars().count() > MIN_CONTINUATION_CHARS && !line.starts_with('-') && !line.starts_with("==")
}

#[derive(Debug)]
struct PendingPrompt {
    page: u32,
    panel: u32,
    prompt: String,
}

#[derive(Debug, Default)]
struct PromptScan {
    pending: Option<PendingPrompt>,
    prompts: Vec<ImagePrompt>,
}

impl PromptScan {
    fn on_single_index_marker(&mut self, caps: &Captures<'_>) {
        match number(caps, 1) {
            Some(panel) => self.start(1, panel, text(caps, 2)),
            None => self.on_malformed_marker(caps),
        }
    }

    fn on_page_panel_marker(&mut self, caps: &Captures<'_>) {
        match (number(caps, 1), number(caps, 2)) {
            (Some(page), Some(panel)) => self.start(page, panel, text(caps, 3)),
            _ => self.on_malformed_marker(caps),
        }
    }

    /// A line shaped like a marker that does not parse closes the open prompt
    /// so that the lines following it are skipped too.
    fn on_malformed_marker(&mut self, caps: &Captures<'_>) {
        warn!(line = &caps[0], "Skipping malformed prompt marker");
        self.flush();
    }

    /// A marker of the other dialect is never a continuation.
    fn on_foreign_marker(&mut self, caps: &Captures<'_>) {
        warn!(line = &caps[0], "Skipping marker of the other dialect");
        self.flush();
    }

    fn start(&mut self, page: u32, panel: u32, initial: &str) {
        self.flush();
        debug!(page, panel, "Prompt marker");
        self.pending = Some(PendingPrompt {
            page,
            panel,
            prompt: initial.to_string(),
        });
    }

    fn on_untagged(&mut self, line: &str) {
        if is_boilerplate(line) {
            debug!(line, "Dropping instruction echo");
            return;
        }
        match self.pending.as_mut() {
            Some(pending) if is_continuation(line) => {
                if !pending.prompt.is_empty() {
                    pending.prompt.push('\n');
                }
                pending.prompt.push_str(line);
            }
            _ => debug!(line, "Ignoring line outside any prompt"),
        }
    }

    fn flush(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let prompt = pending.prompt.trim();
        if prompt.is_empty() {
            return;
        }
        let record = ImagePrompt::new(pending.page, pending.panel, prompt);
        match self.prompts.iter_mut().find(|p| p.key() == record.key()) {
            Some(existing) => {
                warn!(page = record.page, panel = record.panel, "Prompt repeated, keeping the later one");
                *existing = record;
            }
            None => self.prompts.push(record),
        }
    }
}

/// Parse an image prompt response written in `dialect`.
///
/// A marker line opens a prompt with the text after `PROMPT:`. Following
/// lines longer than five characters that do not start with `-` or `==`
/// continue it, joined with newlines. Lines echoing the instructions
/// (containing "below" or "english") are dropped. The result is sorted by
/// page, then panel.
///
/// # Errors
///
/// Returns a [`ParseFailure`] holding `text` verbatim when no prompt was found
/// in an input longer than ten characters. Shorter input yields an empty list.
///
/// # Examples
///
/// ```
/// use bulle_core::PromptDialect;
/// use bulle_parse::parse_prompts;
///
/// let text = "PANEL 2 PROMPT: a dragon\nPANEL 1 PROMPT: a knight,\nin silver armor";
/// let prompts = parse_prompts(text, PromptDialect::SingleIndex).unwrap();
/// assert_eq!(prompts[0].panel, 1);
/// assert_eq!(prompts[0].prompt, "a knight,\nin silver armor");
/// assert_eq!(prompts[1].page, 1);
/// ```
#[instrument(skip(text), fields(text_len = text.len()))]
pub fn parse_prompts(text: &str, dialect: PromptDialect) -> ParseResult<Vec<ImagePrompt>> {
    let table = tags(dialect);
    let mut scan = PromptScan::default();
    for line in lines(text) {
        if table.dispatch(&mut scan, &line).is_none() {
            scan.on_untagged(&line);
        }
    }
    scan.flush();

    let mut prompts = scan.prompts;
    prompts.sort_by_key(ImagePrompt::key);

    if prompts.is_empty() && text.chars().count() > TRIVIAL_INPUT_CHARS {
        warn!(text_len = text.len(), "No prompts found in response");
        return Err(ParseFailure::new(
            text,
            format!(
                "Parsing failed: No prompts parsed matching the expected format ({}).",
                expected_format(dialect)
            ),
        ));
    }

    debug!(prompts = prompts.len(), "Prompts parsed");
    Ok(prompts)
}

/// Dialect whose markers appear in `text`, preferring `page-panel`.
///
/// # Examples
///
/// ```
/// use bulle_core::PromptDialect;
/// use bulle_parse::detect_dialect;
///
/// assert_eq!(detect_dialect("CASE 1 PROMPT: fog"), Some(PromptDialect::SingleIndex));
/// assert_eq!(detect_dialect("PAGE 2 - CASE 1 PROMPT: fog"), Some(PromptDialect::PagePanel));
/// assert_eq!(detect_dialect("fog"), None);
/// ```
pub fn detect_dialect(text: &str) -> Option<PromptDialect> {
    [PromptDialect::PagePanel, PromptDialect::SingleIndex]
        .into_iter()
        .find(|dialect| {
            let table = tags(*dialect);
            lines(text).any(|line| table.matches("marker", &line))
        })
}
