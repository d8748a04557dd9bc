//! Server command handler.

use bulle::{
    AppState, BulleConfig, BulleDriver, BulleResult, GeminiClient, SharedDriver, serve,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Serve the HTTP API until the process stops.
///
/// Without an API key the server still starts: parse routes work and
/// generation routes report the missing key.
pub async fn serve_api(bind: Option<String>, config: &BulleConfig) -> BulleResult<()> {
    let state = match GeminiClient::from_config(config.gemini()) {
        Ok(client) => {
            info!(model = client.model_name(), "Using Gemini backend");
            AppState::new(Arc::new(client) as SharedDriver, config)
        }
        Err(e) => {
            warn!(error = %e, "No generation backend, serving parse routes only");
            AppState::without_backend(config)
        }
    };

    let bind = bind.unwrap_or_else(|| config.server().bind().clone());
    serve(state, &bind).await
}
