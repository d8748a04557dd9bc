//! Generation command handlers.

use super::StoryArgs;
use bulle::{
    BulleConfig, BulleDriver, BulleResult, ChapterPipeline, GeminiClient, ParseOutcome, Stages,
    StoryRequest,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

fn stages(config: &BulleConfig) -> BulleResult<Stages<Arc<dyn BulleDriver>>> {
    let client = GeminiClient::from_config(config.gemini())?;
    info!(model = client.model_name(), "Using Gemini backend");
    Ok(Stages::from_config(Arc::new(client) as Arc<dyn BulleDriver>, config))
}

/// Run the outline stage and render its result as pretty JSON.
#[instrument(skip_all)]
pub async fn generate_outline(
    args: StoryArgs,
    config: &BulleConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let story = StoryRequest::from(args);
    let outline = stages(config)?.outline(&story).await?;
    Ok(serde_json::to_string_pretty(&json!({ "outline": outline }))?)
}

/// Run the outline stage, then every selected chapter, and render all
/// results as pretty JSON.
#[instrument(skip_all, fields(chapters = ?chapters))]
pub async fn generate_comic(
    args: StoryArgs,
    chapters: &[u32],
    config: &BulleConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let story = StoryRequest::from(args);
    let stages = stages(config)?;

    let outline = match stages.outline(&story).await? {
        ParseOutcome::Parsed(outline) => outline,
        unparsed @ ParseOutcome::Unparsed(_) => {
            warn!("Outline not parsed, chapters skipped");
            return Ok(serde_json::to_string_pretty(&json!({ "outline": unparsed }))?);
        }
    };

    let runs = ChapterPipeline::new(stages)
        .run_chapters(&story, &outline, chapters)
        .await;
    Ok(serde_json::to_string_pretty(&json!({
        "outline": outline,
        "chapters": runs,
    }))?)
}
