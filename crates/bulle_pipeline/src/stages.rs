//! Stage callers: validate, prompt, generate, parse.

use crate::{
    build_chapter_detail_prompt, build_outline_prompt, build_prompts_prompt,
    build_storyboard_prompt,
};
use bulle_core::{
    BulleConfig, ChapterDetail, ChapterDetailRequest, GenerateRequest, GenerationParams,
    ImagePrompt, Outline, ParseOutcome, PipelineConfig, PromptsRequest, StoryRequest,
    StoryboardPanel, StoryboardRequest,
};
use bulle_error::{BulleResult, GenerationError, GenerationErrorKind};
use bulle_interface::BulleDriver;
use bulle_parse::{StoryboardParser, parse_chapter_detail, parse_outline, parse_prompts};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// The four generation stages of a comic script.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    /// Global title and chapter list
    Outline,
    /// Page/panel script of one chapter
    ChapterDetail,
    /// Framed panel descriptions of one chapter
    Storyboard,
    /// One image prompt per panel of one chapter
    ImagePrompts,
}

impl Stage {
    /// Headline shown when the stage fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulle_pipeline::Stage;
    ///
    /// assert_eq!(Stage::Outline.failure_headline(None), "Échec génération ossature.");
    /// assert_eq!(
    ///     Stage::Storyboard.failure_headline(Some(3)),
    ///     "Échec génération storyboard chap. 3."
    /// );
    /// ```
    pub fn failure_headline(&self, chapter: Option<u32>) -> String {
        let chapter = chapter.map_or_else(|| "?".to_string(), |n| n.to_string());
        match self {
            Stage::Outline => "Échec génération ossature.".to_string(),
            Stage::ChapterDetail => format!("Échec génération détail chap. {chapter}."),
            Stage::Storyboard => format!("Échec génération storyboard chap. {chapter}."),
            Stage::ImagePrompts => format!("Échec génération prompts chap. {chapter}."),
        }
    }
}

/// Runs single stages against a generation backend.
///
/// Every stage validates its request before any backend call, waits at most
/// the stage timeout for the answer, and parses it. A response without
/// recognizable structure is returned as [`ParseOutcome::Unparsed`], not as
/// an error.
pub struct Stages<D: BulleDriver> {
    driver: D,
    pipeline: PipelineConfig,
    params: GenerationParams,
    timeout: Duration,
}

impl<D: BulleDriver> Stages<D> {
    /// Stages with default pipeline settings and provider-default sampling.
    pub fn new(driver: D) -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            driver,
            timeout: pipeline.stage_timeout(),
            pipeline,
            params: GenerationParams::default(),
        }
    }

    /// Stages using the pipeline and generation sections of `config`.
    pub fn from_config(driver: D, config: &BulleConfig) -> Self {
        Self::new(driver)
            .with_pipeline(config.pipeline().clone())
            .with_params(config.generation().params())
    }

    /// Replace the pipeline settings, including the stage timeout.
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.timeout = pipeline.stage_timeout();
        self.pipeline = pipeline;
        self
    }

    /// Sampling parameters sent with every call.
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Bound on a single backend call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The generation backend.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Current pipeline settings.
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }

    async fn call(&self, prompt: String) -> BulleResult<String> {
        let request = GenerateRequest::builder()
            .prompt(prompt)
            .params(self.params)
            .build()?;

        debug!(
            provider = self.driver.provider_name(),
            model = self.driver.model_name(),
            prompt_len = request.prompt().len(),
            "Calling generation backend"
        );
        let response = tokio::time::timeout(self.timeout, self.driver.generate(&request))
            .await
            .map_err(|_| {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "Generation timed out");
                GenerationError::new(GenerationErrorKind::Timeout(self.timeout.as_secs()))
            })??;

        if response.text.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        }
        Ok(response.text)
    }

    /// Generate and parse the outline of the whole comic.
    #[instrument(skip_all, fields(stage = %Stage::Outline))]
    pub async fn outline(&self, story: &StoryRequest) -> BulleResult<ParseOutcome<Outline>> {
        story.validate()?;
        let text = self.call(build_outline_prompt(story)).await?;
        let outcome = ParseOutcome::from(parse_outline(&text));
        match &outcome {
            ParseOutcome::Parsed(outline) => {
                info!(chapters = outline.chapters.len(), "Outline parsed")
            }
            ParseOutcome::Unparsed(failure) => warn!(error = %failure, "Outline not parsed"),
        }
        Ok(outcome)
    }

    /// Generate the detailed script of one chapter.
    #[instrument(skip_all, fields(stage = %Stage::ChapterDetail, chapter = req.chapter_number))]
    pub async fn chapter_detail(&self, req: &ChapterDetailRequest) -> BulleResult<ChapterDetail> {
        let chapter = req.validate()?;
        let text = self.call(build_chapter_detail_prompt(req)).await?;
        let detail = parse_chapter_detail(chapter, &text)
            .map_err(|_| GenerationError::new(GenerationErrorKind::EmptyResponse))?;
        info!(text_len = detail.text.len(), "Chapter detail generated");
        Ok(detail)
    }

    /// Generate and parse the storyboard of one chapter.
    #[instrument(skip_all, fields(stage = %Stage::Storyboard, chapter = req.chapter_number))]
    pub async fn storyboard(
        &self,
        req: &StoryboardRequest,
    ) -> BulleResult<ParseOutcome<Vec<StoryboardPanel>>> {
        req.validate()?;
        let text = self.call(build_storyboard_prompt(req)).await?;
        let parser = StoryboardParser::with_fallback(*self.pipeline.page_fallback());
        let outcome = ParseOutcome::from(parser.parse(&text));
        match &outcome {
            ParseOutcome::Parsed(panels) => info!(panels = panels.len(), "Storyboard parsed"),
            ParseOutcome::Unparsed(failure) => warn!(error = %failure, "Storyboard not parsed"),
        }
        Ok(outcome)
    }

    /// Generate and parse the image prompts of one chapter.
    ///
    /// The request's dialect wins over the configured one.
    #[instrument(skip_all, fields(stage = %Stage::ImagePrompts, chapter = req.chapter_number))]
    pub async fn image_prompts(
        &self,
        req: &PromptsRequest,
    ) -> BulleResult<ParseOutcome<Vec<ImagePrompt>>> {
        req.validate()?;
        let dialect = req.dialect.unwrap_or(*self.pipeline.prompt_dialect());
        let text = self.call(build_prompts_prompt(req, dialect)).await?;
        let outcome = ParseOutcome::from(parse_prompts(&text, dialect));
        match &outcome {
            ParseOutcome::Parsed(prompts) => {
                info!(prompts = prompts.len(), %dialect, "Image prompts parsed")
            }
            ParseOutcome::Unparsed(failure) => warn!(error = %failure, "Image prompts not parsed"),
        }
        Ok(outcome)
    }
}
