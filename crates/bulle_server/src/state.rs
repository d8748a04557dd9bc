//! Shared handler state.

use bulle_core::{BulleConfig, PipelineConfig};
use bulle_error::{BulleResult, GenerationError, GenerationErrorKind};
use bulle_interface::BulleDriver;
use bulle_pipeline::Stages;
use std::sync::Arc;

/// Generation backend shared by all handlers.
pub type SharedDriver = Arc<dyn BulleDriver>;

struct Inner {
    stages: Option<Stages<SharedDriver>>,
    api_key_env: String,
    pipeline: PipelineConfig,
}

/// State handed to every route.
///
/// Without a backend the server still answers: parse routes work and every
/// generation route reports the missing API key.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// State generating with `driver`, configured by `config`.
    pub fn new(driver: SharedDriver, config: &BulleConfig) -> Self {
        Self::from_stages(Stages::from_config(driver, config), config)
    }

    /// State around prepared stage callers.
    pub fn from_stages(stages: Stages<SharedDriver>, config: &BulleConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline: stages.pipeline().clone(),
                stages: Some(stages),
                api_key_env: config.gemini().api_key_env().clone(),
            }),
        }
    }

    /// State with no generation backend.
    pub fn without_backend(config: &BulleConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                stages: None,
                api_key_env: config.gemini().api_key_env().clone(),
                pipeline: config.pipeline().clone(),
            }),
        }
    }

    /// Stage callers, or the missing API key error.
    pub fn stages(&self) -> BulleResult<&Stages<SharedDriver>> {
        self.inner.stages.as_ref().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::MissingApiKey(
                self.inner.api_key_env.clone(),
            ))
            .into()
        })
    }

    /// Pipeline settings used by the parse routes.
    pub fn pipeline(&self) -> &PipelineConfig {
        &self.inner.pipeline
    }
}
