//! Request and response types for text generation.

use bulle_error::{BuilderError, BuilderErrorKind};
use serde::{Deserialize, Serialize};

/// Optional sampling parameters of one generation call.
///
/// Unset values fall back to the provider's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    /// Maximum number of tokens to generate
    pub max_output_tokens: Option<u32>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Penalty applied to already generated tokens
    pub repetition_penalty: Option<f32>,
}

/// One prompt sent to a generation backend.
///
/// # Examples
///
/// ```
/// use bulle_core::{GenerateRequest, GenerationParams};
///
/// let request = GenerateRequest::builder()
///     .prompt("TITRE GLOBAL : ?")
///     .params(GenerationParams {
///         temperature: Some(0.7),
///         ..Default::default()
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt(), "TITRE GLOBAL : ?");
/// assert!(request.model().is_none());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct GenerateRequest {
    /// Full prompt text
    prompt: String,
    /// Sampling parameters
    #[builder(default)]
    params: GenerationParams,
    /// Model override, the backend's configured model when unset
    #[builder(default, setter(into, strip_option))]
    model: Option<String>,
}

impl GenerateRequest {
    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

impl GenerateRequestBuilder {
    /// Build the GenerateRequest.
    ///
    /// # Errors
    ///
    /// Returns error if the prompt was never set.
    #[track_caller]
    pub fn build(&self) -> Result<GenerateRequest, BuilderError> {
        self.build_internal()
            .map_err(|e| BuilderError::new(BuilderErrorKind::MissingField(e.to_string())))
    }
}

/// Text returned by a generation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text
    pub text: String,
}

impl GenerateResponse {
    /// Wrap generated text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_prompt() {
        let err = GenerateRequest::builder().build().unwrap_err();
        assert!(matches!(err.kind(), BuilderErrorKind::MissingField(_)));
    }

    #[test]
    fn test_builder_sets_model() {
        let request = GenerateRequest::builder()
            .prompt("p")
            .model("gemini-1.5-flash")
            .build()
            .unwrap();
        assert_eq!(request.model().as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(*request.params(), GenerationParams::default());
    }
}
