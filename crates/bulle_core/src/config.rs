//! Layered configuration.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from bulle.toml)
//! - User config (~/.config/bulle/bulle.toml)
//! - Local config (./bulle.toml)
//! - Environment variables (`BULLE__SECTION__KEY`)

use crate::{GenerationParams, PageFallback, PromptDialect};
use bulle_error::{BulleError, BulleResult, ConfigError};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../bulle.toml");

/// Gemini backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model identifier
    model: String,
    /// Environment variable holding the API key
    api_key_env: String,
    /// REST endpoint root
    base_url: String,
    /// Per-request HTTP timeout in seconds
    request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-pro-latest".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            request_timeout_secs: 180,
        }
    }
}

impl GeminiConfig {
    /// Settings for `model` at `base_url`, other values default.
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Use a different environment variable for the API key.
    pub fn with_api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }

    /// HTTP timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Sampling parameters applied to every stage call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct GenerationDefaults {
    /// Maximum number of tokens to generate
    max_output_tokens: Option<u32>,
    /// Sampling temperature
    temperature: Option<f32>,
    /// Repetition penalty
    repetition_penalty: Option<f32>,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_output_tokens: Some(8192),
            temperature: Some(0.7),
            repetition_penalty: Some(1.2),
        }
    }
}

impl GenerationDefaults {
    /// As request parameters.
    pub fn params(&self) -> GenerationParams {
        GenerationParams {
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            repetition_penalty: self.repetition_penalty,
        }
    }
}

/// Stage pipeline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct PipelineConfig {
    /// Bound on each generation call, in seconds
    stage_timeout_secs: u64,
    /// Chapters processed at the same time
    max_concurrent_chapters: usize,
    /// Storyboard page fallback policy
    page_fallback: PageFallback,
    /// Image prompt marker grammar
    prompt_dialect: PromptDialect,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_timeout_secs: 120,
            max_concurrent_chapters: 4,
            page_fallback: PageFallback::Lenient,
            prompt_dialect: PromptDialect::PagePanel,
        }
    }
}

impl PipelineConfig {
    /// Stage timeout as a duration.
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }

    /// Override the stage timeout.
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Override the chapter concurrency bound.
    pub fn with_max_concurrent_chapters(mut self, max: usize) -> Self {
        self.max_concurrent_chapters = max;
        self
    }

    /// Override the storyboard page fallback policy.
    pub fn with_page_fallback(mut self, fallback: PageFallback) -> Self {
        self.page_fallback = fallback;
        self
    }

    /// Override the image prompt dialect.
    pub fn with_prompt_dialect(mut self, dialect: PromptDialect) -> Self {
        self.prompt_dialect = dialect;
        self
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Listen on `bind` instead.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }
}

/// Top-level Bulle configuration.
///
/// # Example
///
/// ```no_run
/// use bulle_core::BulleConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = BulleConfig::load()?;
/// println!("model: {}", config.gemini().model());
/// # Ok(())
/// # }
/// ```
#[derive(
    Debug, Clone, PartialEq, Default, Serialize, Deserialize, derive_getters::Getters,
)]
#[serde(default)]
pub struct BulleConfig {
    /// Gemini backend
    gemini: GeminiConfig,
    /// Sampling defaults
    generation: GenerationDefaults,
    /// Stage pipeline
    pipeline: PipelineConfig,
    /// HTTP server
    server: ServerConfig,
}

impl BulleConfig {
    /// Assemble a configuration from its sections.
    pub fn new(
        gemini: GeminiConfig,
        generation: GenerationDefaults,
        pipeline: PipelineConfig,
        server: ServerConfig,
    ) -> Self {
        Self {
            gemini,
            generation,
            pipeline,
            server,
        }
    }

    /// Parse a configuration from TOML text on top of the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml_str(toml: &str) -> BulleResult<Self> {
        Self::deserialize_from(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> BulleResult<Self> {
        debug!("Loading configuration from file");
        Self::deserialize_from(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    #[instrument]
    pub fn load() -> BulleResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/bulle/bulle.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("bulle").required(false))
            .add_source(
                Environment::with_prefix("BULLE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::deserialize_from(builder)
    }

    fn deserialize_from(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> BulleResult<Self> {
        builder
            .build()
            .map_err(|e| {
                BulleError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                BulleError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Replace the Gemini section.
    pub fn with_gemini(mut self, gemini: GeminiConfig) -> Self {
        self.gemini = gemini;
        self
    }

    /// Replace the pipeline section.
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Replace the server section.
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_defaults_match_code_defaults() {
        let bundled = BulleConfig::from_toml_str("").unwrap();
        assert_eq!(bundled, BulleConfig::default());
    }

    #[test]
    fn test_override_keeps_other_defaults() {
        let config = BulleConfig::from_toml_str(
            "[pipeline]\npage_fallback = \"strict\"\nmax_concurrent_chapters = 2\n",
        )
        .unwrap();
        assert_eq!(*config.pipeline().page_fallback(), PageFallback::Strict);
        assert_eq!(*config.pipeline().max_concurrent_chapters(), 2);
        assert_eq!(*config.pipeline().stage_timeout_secs(), 120);
        assert_eq!(config.gemini().model(), "gemini-1.5-pro-latest");
    }

    #[test]
    fn test_unknown_fallback_is_config_error() {
        let err = BulleConfig::from_toml_str("[pipeline]\npage_fallback = \"loose\"\n").unwrap_err();
        assert!(matches!(err.kind(), bulle_error::BulleErrorKind::Config(_)));
    }
}
