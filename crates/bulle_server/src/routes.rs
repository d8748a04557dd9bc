//! Route handlers.

use crate::{AppError, AppResult, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use bulle_core::{
    ChapterDetailRequest, ImagePrompt, Outline, PageFallback, ParseOutcome, PromptDialect,
    PromptsRequest, StoryRequest, StoryboardPanel, StoryboardRequest,
};
use bulle_parse::{StoryboardParser, detect_dialect, parse_outline, parse_prompts};
use bulle_pipeline::Stage;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Body of `POST /api/generate-story` and `POST /api/parse/outline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineResponse {
    /// Parsed outline or raw text
    pub outline: ParseOutcome<Outline>,
}

/// Body of `POST /api/generate-chapter-detail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResponse {
    /// Detailed chapter script
    pub scenario_text: String,
}

/// Body of `POST /api/generate-storyboard-chapter` and `POST /api/parse/storyboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryboardResponse {
    /// Parsed panels or raw text
    pub storyboard: ParseOutcome<Vec<StoryboardPanel>>,
}

/// Body of `POST /api/generate-prompts-chapter` and `POST /api/parse/prompts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptsResponse {
    /// Parsed prompts or raw text
    pub prompts: ParseOutcome<Vec<ImagePrompt>>,
    /// Dialect the text was read with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialect: Option<PromptDialect>,
}

/// Request of the offline parse routes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseRequest {
    /// Model answer to parse
    pub text: String,
    /// Image prompt dialect, detected from the text when unset
    pub dialect: Option<PromptDialect>,
    /// Storyboard page fallback, the configured one when unset
    pub page_fallback: Option<PageFallback>,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate-story", post(generate_story))
        .route("/api/generate-chapter-detail", post(generate_chapter_detail))
        .route(
            "/api/generate-storyboard-chapter",
            post(generate_storyboard_chapter),
        )
        .route("/api/generate-prompts-chapter", post(generate_prompts_chapter))
        .route("/api/parse/outline", post(parse_outline_text))
        .route("/api/parse/storyboard", post(parse_storyboard_text))
        .route("/api/parse/prompts", post(parse_prompts_text))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let backend = state
        .stages()
        .map(|stages| {
            serde_json::json!({
                "provider": stages.driver().provider_name(),
                "model": stages.driver().model_name(),
            })
        })
        .unwrap_or(serde_json::Value::Null);
    Json(serde_json::json!({ "status": "ok", "backend": backend }))
}

#[instrument(skip_all)]
async fn generate_story(
    State(state): State<AppState>,
    payload: Result<Json<StoryRequest>, JsonRejection>,
) -> AppResult<Json<OutlineResponse>> {
    let fail = |e| AppError::stage(Stage::Outline, None, e);
    let stages = state.stages().map_err(fail)?;
    let story = body(payload)?;
    let outline = stages.outline(&story).await.map_err(fail)?;
    Ok(Json(OutlineResponse { outline }))
}

#[instrument(skip_all)]
async fn generate_chapter_detail(
    State(state): State<AppState>,
    payload: Result<Json<ChapterDetailRequest>, JsonRejection>,
) -> AppResult<Json<ScenarioResponse>> {
    let stages = state
        .stages()
        .map_err(|e| AppError::stage(Stage::ChapterDetail, None, e))?;
    let req = body(payload)?;
    let detail = stages
        .chapter_detail(&req)
        .await
        .map_err(|e| AppError::stage(Stage::ChapterDetail, req.chapter_number, e))?;
    Ok(Json(ScenarioResponse {
        scenario_text: detail.text,
    }))
}

#[instrument(skip_all)]
async fn generate_storyboard_chapter(
    State(state): State<AppState>,
    payload: Result<Json<StoryboardRequest>, JsonRejection>,
) -> AppResult<Json<StoryboardResponse>> {
    let stages = state
        .stages()
        .map_err(|e| AppError::stage(Stage::Storyboard, None, e))?;
    let req = body(payload)?;
    let storyboard = stages
        .storyboard(&req)
        .await
        .map_err(|e| AppError::stage(Stage::Storyboard, req.chapter_number, e))?;
    Ok(Json(StoryboardResponse { storyboard }))
}

#[instrument(skip_all)]
async fn generate_prompts_chapter(
    State(state): State<AppState>,
    payload: Result<Json<PromptsRequest>, JsonRejection>,
) -> AppResult<Json<PromptsResponse>> {
    let stages = state
        .stages()
        .map_err(|e| AppError::stage(Stage::ImagePrompts, None, e))?;
    let req = body(payload)?;
    let dialect = req.dialect.unwrap_or(*stages.pipeline().prompt_dialect());
    let prompts = stages
        .image_prompts(&req)
        .await
        .map_err(|e| AppError::stage(Stage::ImagePrompts, req.chapter_number, e))?;
    Ok(Json(PromptsResponse {
        prompts,
        dialect: Some(dialect),
    }))
}

#[instrument(skip_all)]
async fn parse_outline_text(
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> AppResult<Json<OutlineResponse>> {
    let req = body(payload)?;
    Ok(Json(OutlineResponse {
        outline: parse_outline(&req.text).into(),
    }))
}

#[instrument(skip_all)]
async fn parse_storyboard_text(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> AppResult<Json<StoryboardResponse>> {
    let req = body(payload)?;
    let fallback = req
        .page_fallback
        .unwrap_or(*state.pipeline().page_fallback());
    let parser = StoryboardParser::with_fallback(fallback);
    Ok(Json(StoryboardResponse {
        storyboard: parser.parse(&req.text).into(),
    }))
}

#[instrument(skip_all)]
async fn parse_prompts_text(
    State(state): State<AppState>,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> AppResult<Json<PromptsResponse>> {
    let req = body(payload)?;
    let dialect = req
        .dialect
        .or_else(|| detect_dialect(&req.text))
        .unwrap_or(*state.pipeline().prompt_dialect());
    Ok(Json(PromptsResponse {
        prompts: parse_prompts(&req.text, dialect).into(),
        dialect: Some(dialect),
    }))
}
