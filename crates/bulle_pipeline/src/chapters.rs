//! Concurrent per-chapter pipeline.

use crate::{Stage, Stages};
use bulle_core::{
    Chapter, ChapterDetail, ChapterDetailRequest, ImagePrompt, Outline, ParseOutcome,
    PromptsRequest, StoryRequest, StoryboardPanel, StoryboardRequest,
};
use bulle_error::BulleError;
use bulle_interface::BulleDriver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Semaphore, watch};
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, instrument, warn};

/// Why a chapter's chain stopped early.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFailure {
    /// Stage that failed
    pub stage: Stage,
    /// Headline naming the stage and chapter
    pub error: String,
    /// User-facing reason
    pub details: String,
    /// Suggested HTTP status
    pub status_code: u16,
}

impl StageFailure {
    /// Describe `err` raised by `stage` for `chapter`.
    pub fn new(stage: Stage, chapter: u32, err: &BulleError) -> Self {
        Self {
            stage,
            error: stage.failure_headline(Some(chapter)),
            details: err.user_message(),
            status_code: err.status_code(),
        }
    }

    /// Describe a chain that died while running `stage`.
    pub fn aborted(stage: Stage, chapter: u32, err: &JoinError) -> Self {
        Self {
            stage,
            error: stage.failure_headline(Some(chapter)),
            details: format!("Tâche interrompue : {err}"),
            status_code: 500,
        }
    }
}

/// Everything one chapter's chain produced.
///
/// Stages run in order (detail, storyboard, image prompts) and each one
/// needs the previous one's output, so a missing field means the chain
/// stopped before reaching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRun {
    /// Chapter number
    pub chapter: u32,
    /// Chapter title from the outline
    pub title: String,
    /// Detailed script
    pub detail: Option<ChapterDetail>,
    /// Storyboard panels, or the unparsed answer
    pub storyboard: Option<ParseOutcome<Vec<StoryboardPanel>>>,
    /// Image prompts, or the unparsed answer
    pub prompts: Option<ParseOutcome<Vec<ImagePrompt>>>,
    /// Error that stopped the chain
    pub failure: Option<StageFailure>,
}

impl ChapterRun {
    fn new(chapter: &Chapter) -> Self {
        Self {
            chapter: chapter.number,
            title: chapter.title.clone(),
            detail: None,
            storyboard: None,
            prompts: None,
            failure: None,
        }
    }

    /// Whether every stage ran and both parsers found records.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
            && self.storyboard.as_ref().and_then(ParseOutcome::parsed).is_some()
            && self.prompts.as_ref().and_then(ParseOutcome::parsed).is_some()
    }
}

/// Runs detail, storyboard and image prompts for several chapters at once.
///
/// Chapters share nothing but the backend: a failure, timeout or panic in
/// one chapter's chain leaves the others untouched. A chain that panics still
/// yields a run for its chapter, carrying only the failure. At most
/// `max_concurrent_chapters` chains run at the same time.
pub struct ChapterPipeline<D: BulleDriver + 'static> {
    stages: Arc<Stages<D>>,
}

impl<D: BulleDriver + 'static> Clone for ChapterPipeline<D> {
    fn clone(&self) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<D: BulleDriver + 'static> ChapterPipeline<D> {
    /// Pipeline over the given stage callers.
    pub fn new(stages: Stages<D>) -> Self {
        Self {
            stages: Arc::new(stages),
        }
    }

    /// Pipeline sharing already wrapped stage callers.
    pub fn from_shared(stages: Arc<Stages<D>>) -> Self {
        Self { stages }
    }

    /// The stage callers.
    pub fn stages(&self) -> &Stages<D> {
        &self.stages
    }

    /// Run the chain for `chapters` of `outline`, or for every chapter when
    /// `chapters` is empty.
    ///
    /// Numbers absent from the outline are skipped. Runs come back ordered by
    /// chapter number.
    #[instrument(skip_all, fields(title = %outline.title, requested = chapters.len()))]
    pub async fn run_chapters(
        &self,
        story: &StoryRequest,
        outline: &Outline,
        chapters: &[u32],
    ) -> Vec<ChapterRun> {
        let selected: Vec<&Chapter> = if chapters.is_empty() {
            outline.chapters.iter().collect()
        } else {
            chapters
                .iter()
                .filter_map(|&n| {
                    let found = outline.chapter(n);
                    if found.is_none() {
                        warn!(chapter = n, "Chapter not in outline, skipped");
                    }
                    found
                })
                .collect()
        };

        let limit = (*self.stages.pipeline().max_concurrent_chapters()).max(1);
        let semaphore = Arc::new(Semaphore::new(limit));
        let total = outline.chapters.len() as u32;
        let mut tasks = JoinSet::new();

        for chapter in selected {
            let stages = Arc::clone(&self.stages);
            let semaphore = Arc::clone(&semaphore);
            let story = story.clone();
            let global_title = outline.title.clone();
            let chapter = chapter.clone();

            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("Semaphore should not be closed");

                let mut aborted = ChapterRun::new(&chapter);
                let (progress, current) = watch::channel(Stage::ChapterDetail);
                let chain = tokio::spawn(async move {
                    run_chapter(&stages, &story, &global_title, total, &chapter, &progress).await
                });
                match chain.await {
                    Ok(run) => run,
                    Err(e) => {
                        let stage = *current.borrow();
                        error!(
                            chapter = aborted.chapter,
                            %stage,
                            error = %e,
                            "Chapter chain aborted"
                        );
                        aborted.failure = Some(StageFailure::aborted(stage, aborted.chapter, &e));
                        aborted
                    }
                }
            });
        }

        let mut runs = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(run) => runs.push(run),
                Err(e) => error!(error = %e, "Chapter task aborted"),
            }
        }
        runs.sort_by_key(|run| run.chapter);

        let complete = runs.iter().filter(|run| run.is_complete()).count();
        info!(chapters = runs.len(), complete, "Chapter pipeline finished");
        runs
    }
}

#[instrument(skip_all, fields(chapter = chapter.number))]
async fn run_chapter<D: BulleDriver>(
    stages: &Stages<D>,
    story: &StoryRequest,
    global_title: &str,
    total: u32,
    chapter: &Chapter,
    progress: &watch::Sender<Stage>,
) -> ChapterRun {
    let mut run = ChapterRun::new(chapter);
    let number = chapter.number;

    let detail_req = ChapterDetailRequest {
        story: story.clone(),
        global_title: global_title.to_string(),
        total_chapters: Some(total),
        chapter_number: Some(number),
        chapter_title: chapter.title.clone(),
        chapter_summary: Some(chapter.summary.clone()).filter(|s| !s.trim().is_empty()),
    };
    let detail = match stages.chapter_detail(&detail_req).await {
        Ok(detail) => detail,
        Err(e) => {
            warn!(error = %e, "Chapter detail failed");
            run.failure = Some(StageFailure::new(Stage::ChapterDetail, number, &e));
            return run;
        }
    };

    let storyboard_req = StoryboardRequest {
        style: story.style.clone(),
        genre: Some(story.genre.clone()),
        tone: Some(story.tone.clone()),
        details: story.details().map(str::to_string),
        global_title: Some(global_title.to_string()),
        chapter_number: Some(number),
        chapter_title: Some(chapter.title.clone()),
        detailed_scenario_text: detail.text.clone(),
    };
    run.detail = Some(detail);

    progress.send_replace(Stage::Storyboard);
    let storyboard = match stages.storyboard(&storyboard_req).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "Storyboard failed");
            run.failure = Some(StageFailure::new(Stage::Storyboard, number, &e));
            return run;
        }
    };
    let panels = match &storyboard {
        ParseOutcome::Parsed(panels) => panels.clone(),
        ParseOutcome::Unparsed(_) => {
            warn!("Storyboard unparsed, image prompts skipped");
            run.storyboard = Some(storyboard);
            return run;
        }
    };
    run.storyboard = Some(storyboard);

    progress.send_replace(Stage::ImagePrompts);
    let prompts_req = PromptsRequest {
        style: story.style.clone(),
        genre: Some(story.genre.clone()),
        tone: Some(story.tone.clone()),
        details: story.details().map(str::to_string),
        global_title: Some(global_title.to_string()),
        chapter_number: Some(number),
        chapter_title: Some(chapter.title.clone()),
        storyboard: panels,
        dialect: None,
    };
    match stages.image_prompts(&prompts_req).await {
        Ok(outcome) => run.prompts = Some(outcome),
        Err(e) => {
            warn!(error = %e, "Image prompts failed");
            run.failure = Some(StageFailure::new(Stage::ImagePrompts, number, &e));
        }
    }
    run
}
