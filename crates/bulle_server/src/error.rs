use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bulle_error::{BulleError, BulleErrorKind, GenerationErrorKind};
use bulle_pipeline::Stage;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Produces `{ "error", "details", "code" }` JSON bodies.
#[derive(Debug)]
pub enum AppError {
    /// A stage could not produce its answer.
    Stage {
        /// Failing stage
        stage: Stage,
        /// Chapter of the request, if any
        chapter: Option<u32>,
        /// Underlying error
        source: BulleError,
    },
    /// The request body could not be read.
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wrap an error raised while running `stage`.
    pub fn stage(stage: Stage, chapter: Option<u32>, source: BulleError) -> Self {
        Self::Stage {
            stage,
            chapter,
            source,
        }
    }
}

/// Stable machine-readable code of an error.
pub fn error_code(err: &BulleError) -> &'static str {
    match err.kind() {
        BulleErrorKind::Validation(_) => "VALIDATION_ERROR",
        BulleErrorKind::Json(_) => "BAD_REQUEST",
        BulleErrorKind::Generation(e) => match &e.kind {
            GenerationErrorKind::MissingApiKey(_) => "MISSING_API_KEY",
            GenerationErrorKind::Blocked(_) => "BLOCKED",
            GenerationErrorKind::InvalidCredential => "INVALID_CREDENTIAL",
            GenerationErrorKind::ModelNotFound(_) => "MODEL_NOT_FOUND",
            GenerationErrorKind::RateLimited => "RATE_LIMITED",
            GenerationErrorKind::Timeout(_) => "TIMEOUT",
            GenerationErrorKind::Transport(_) => "TRANSPORT_ERROR",
            GenerationErrorKind::HttpStatus { .. } => "UPSTREAM_ERROR",
            GenerationErrorKind::EmptyResponse => "EMPTY_RESPONSE",
        },
        _ => "INTERNAL_ERROR",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "code": "BAD_REQUEST" }),
            ),
            AppError::Stage {
                stage,
                chapter,
                source,
            } => {
                let status = StatusCode::from_u16(source.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let code = error_code(source);
                let body = match source.kind() {
                    BulleErrorKind::Validation(e) => json!({
                        "error": e.message,
                        "details": e.field,
                        "code": code,
                    }),
                    BulleErrorKind::Generation(e)
                        if matches!(e.kind, GenerationErrorKind::MissingApiKey(_)) =>
                    {
                        json!({ "error": source.user_message(), "code": code })
                    }
                    _ => json!({
                        "error": stage.failure_headline(*chapter),
                        "details": source.user_message(),
                        "code": code,
                    }),
                };
                if status.is_server_error() {
                    tracing::error!(%stage, error = %source, "Stage failed");
                } else {
                    tracing::warn!(%stage, error = %source, "Stage rejected");
                }
                (status, body)
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
