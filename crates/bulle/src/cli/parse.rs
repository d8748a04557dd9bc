//! Offline parse command handler.

use super::ParseKind;
use bulle::{
    BulleConfig, OutlineResponse, PageFallback, PromptDialect, PromptsResponse,
    StoryboardParser, StoryboardResponse, detect_dialect, parse_outline, parse_prompts,
};
use std::io::Read;
use std::path::Path;
use tracing::{debug, instrument};

fn read_answer(file: &Path) -> std::io::Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        Ok(text)
    } else {
        std::fs::read_to_string(file)
    }
}

/// Parse the answer stored in `file` and render it as pretty JSON.
///
/// An answer without structure still renders, as `{ rawText, parsingError }`.
#[instrument(skip(config), fields(file = %file.display()))]
pub fn parse_answer(
    kind: ParseKind,
    file: &Path,
    dialect: Option<PromptDialect>,
    strict_pages: bool,
    config: &BulleConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let text = read_answer(file)?;
    debug!(text_len = text.len(), "Answer read");

    let fallback = if strict_pages {
        PageFallback::Strict
    } else {
        *config.pipeline().page_fallback()
    };
    let configured = *config.pipeline().prompt_dialect();

    Ok(render(kind, &text, dialect, fallback, configured)?)
}

fn render(
    kind: ParseKind,
    text: &str,
    dialect: Option<PromptDialect>,
    fallback: PageFallback,
    configured: PromptDialect,
) -> serde_json::Result<String> {
    match kind {
        ParseKind::Outline => serde_json::to_string_pretty(&OutlineResponse {
            outline: parse_outline(text).into(),
        }),
        ParseKind::Storyboard => serde_json::to_string_pretty(&StoryboardResponse {
            storyboard: StoryboardParser::with_fallback(fallback).parse(text).into(),
        }),
        ParseKind::Prompts => {
            let dialect = dialect
                .or_else(|| detect_dialect(text))
                .unwrap_or(configured);
            serde_json::to_string_pretty(&PromptsResponse {
                prompts: parse_prompts(text, dialect).into(),
                dialect: Some(dialect),
            })
        }
    }
}
