//! HTTP surface of Bulle.
//!
//! One POST route per generation stage, offline parse routes, and a health
//! check. Bodies are camelCase JSON. A model answer that could not be parsed
//! is still a `200` carrying `{ "rawText", "parsingError" }`; validation and
//! backend failures are `{ "error", "details", "code" }` with a matching status.
//!
//! | route | body | answer |
//! |---|---|---|
//! | `POST /api/generate-story` | [`StoryRequest`](bulle_core::StoryRequest) | `{ outline }` |
//! | `POST /api/generate-chapter-detail` | [`ChapterDetailRequest`](bulle_core::ChapterDetailRequest) | `{ scenarioText }` |
//! | `POST /api/generate-storyboard-chapter` | [`StoryboardRequest`](bulle_core::StoryboardRequest) | `{ storyboard }` |
//! | `POST /api/generate-prompts-chapter` | [`PromptsRequest`](bulle_core::PromptsRequest) | `{ prompts, dialect }` |
//! | `POST /api/parse/{outline,storyboard,prompts}` | [`ParseRequest`] | same as above |
//! | `GET /health` | | `{ status, backend }` |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod routes;
mod state;

pub use error::{AppError, AppResult, error_code};
pub use routes::{
    OutlineResponse, ParseRequest, PromptsResponse, ScenarioResponse, StoryboardResponse,
    create_router,
};
pub use state::{AppState, SharedDriver};

use bulle_error::{BulleResult, HttpError};
use tracing::info;

/// Serve the API on `bind` until the process stops.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, bind: &str) -> BulleResult<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| HttpError::new(format!("Failed to bind {bind}: {e}")))?;
    info!(address = bind, "Listening");

    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| HttpError::new(format!("Server error: {e}")))?;
    Ok(())
}
