//! Gemini REST client.

use super::dto::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;
use bulle_core::{GeminiConfig, GenerateRequest, GenerateResponse, GenerationParams};
use bulle_error::{
    BulleResult, GenerationError, GenerationErrorKind, HttpError, JsonError,
};
use bulle_interface::BulleDriver;
use reqwest::Client;
use tracing::{debug, instrument, warn};

const INVALID_KEY_MARKER: &str = "API key not valid";
const SAFETY: &str = "SAFETY";

/// Client for Google's Gemini `generateContent` endpoint.
///
/// One prompt per call, no retries. Failures are classified into
/// [`GenerationErrorKind`] so callers can show a distinct message per case.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct GeminiClient {
    #[getter(skip)]
    client: Client,
    #[getter(skip)]
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    defaults: GenerationParams,
}

impl GeminiClient {
    /// Creates a client reading its API key from the environment variable
    /// named by `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key variable is unset or blank
    /// - The HTTP client cannot be initialized
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn from_config(config: &GeminiConfig) -> BulleResult<Self> {
        let api_key = std::env::var(config.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::MissingApiKey(
                    config.api_key_env().clone(),
                ))
            })?;
        Self::with_api_key(api_key, config)
    }

    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    #[instrument(skip_all, fields(model = %config.model()))]
    pub fn with_api_key(api_key: impl Into<String>, config: &GeminiConfig) -> BulleResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            model: config.model().clone(),
            timeout_secs: *config.request_timeout_secs(),
            defaults: GenerationParams::default(),
        })
    }

    /// Sampling parameters applied when a request leaves them unset.
    pub fn with_defaults(mut self, defaults: GenerationParams) -> Self {
        self.defaults = defaults;
        self
    }

    fn effective_params(&self, params: &GenerationParams) -> GenerationParams {
        GenerationParams {
            max_output_tokens: params.max_output_tokens.or(self.defaults.max_output_tokens),
            temperature: params.temperature.or(self.defaults.temperature),
            repetition_penalty: params
                .repetition_penalty
                .or(self.defaults.repetition_penalty),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn convert_error(&self, error: reqwest::Error) -> GenerationError {
        if error.is_timeout() {
            GenerationError::new(GenerationErrorKind::Timeout(self.timeout_secs))
        } else {
            GenerationError::new(GenerationErrorKind::Transport(error.to_string()))
        }
    }
}

#[async_trait]
impl BulleDriver for GeminiClient {
    #[instrument(skip(self, req), fields(provider = "gemini", model = %self.model, prompt_len = req.prompt().len()))]
    async fn generate(&self, req: &GenerateRequest) -> BulleResult<GenerateResponse> {
        let model = req.model().as_deref().unwrap_or(&self.model);
        let body = GenerateContentRequest::new(req.prompt(), &self.effective_params(req.params()));

        debug!(model, "Sending Gemini generateContent request");
        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| self.convert_error(e))?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.convert_error(e))?;

        if !(200..300).contains(&status) {
            let kind = classify_failure(status, &text, model);
            warn!(status, error = %kind, "Gemini request failed");
            return Err(GenerationError::new(kind).into());
        }

        let generated = extract_text(&text)?;
        debug!(response_len = generated.len(), "Gemini response received");
        Ok(GenerateResponse::new(generated))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Classify a non-success Gemini answer.
///
/// # Examples
///
/// ```
/// use bulle_error::GenerationErrorKind;
/// use bulle_models::classify_failure;
///
/// let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key."}}"#;
/// assert_eq!(classify_failure(400, body, "gemini-pro"), GenerationErrorKind::InvalidCredential);
/// assert_eq!(classify_failure(429, "", "gemini-pro"), GenerationErrorKind::RateLimited);
/// ```
pub fn classify_failure(status: u16, body: &str, model: &str) -> GenerationErrorKind {
    if let Some(reason) = block_reason(body) {
        return GenerationErrorKind::Blocked(reason);
    }

    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .map(|error| match error.status {
            Some(code) if error.message.is_empty() => code,
            _ => error.message,
        })
        .unwrap_or_else(|| body.trim().to_string());

    if message.contains(INVALID_KEY_MARKER) || matches!(status, 401 | 403) {
        return GenerationErrorKind::InvalidCredential;
    }

    match status {
        404 => GenerationErrorKind::ModelNotFound(model.to_string()),
        429 => GenerationErrorKind::RateLimited,
        _ => GenerationErrorKind::HttpStatus {
            status_code: status,
            message,
        },
    }
}

/// Concatenated text of the first candidate of a successful answer.
///
/// # Errors
///
/// - [`JsonError`] when the body is not a `generateContent` response
/// - [`GenerationErrorKind::Blocked`] when the prompt or every candidate was blocked
/// - [`GenerationErrorKind::EmptyResponse`] when no text came back
pub fn extract_text(body: &str) -> BulleResult<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| JsonError::new(format!("Invalid Gemini response: {e}")))?;

    if let Some(reason) = blocked(&response) {
        return Err(GenerationError::new(GenerationErrorKind::Blocked(reason)).into());
    }

    let text: String = response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
    }
    Ok(text)
}

fn block_reason(body: &str) -> Option<String> {
    serde_json::from_str::<GenerateContentResponse>(body)
        .ok()
        .and_then(|response| blocked(&response))
}

fn blocked(response: &GenerateContentResponse) -> Option<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.clone())
    {
        return Some(reason);
    }

    let all_safety = !response.candidates.is_empty()
        && response
            .candidates
            .iter()
            .all(|c| c.finish_reason.as_deref() == Some(SAFETY));
    all_safety.then(|| SAFETY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeminiConfig {
        GeminiConfig::new("gemini-1.5-flash", "https://example.test/v1beta/")
    }

    #[test]
    fn test_invalid_key_message_wins_over_status() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            classify_failure(400, body, "m"),
            GenerationErrorKind::InvalidCredential
        );
        assert_eq!(
            classify_failure(403, "", "m"),
            GenerationErrorKind::InvalidCredential
        );
    }

    #[test]
    fn test_not_found_names_model() {
        let body = r#"{"error":{"code":404,"message":"models/gemini-0 is not found"}}"#;
        assert_eq!(
            classify_failure(404, body, "gemini-0"),
            GenerationErrorKind::ModelNotFound("gemini-0".to_string())
        );
    }

    #[test]
    fn test_block_reason_in_error_body() {
        let body = r#"{"promptFeedback":{"blockReason":"OTHER"}}"#;
        assert_eq!(
            classify_failure(400, body, "m"),
            GenerationErrorKind::Blocked("OTHER".to_string())
        );
    }

    #[test]
    fn test_other_status_keeps_message() {
        let body = r#"{"error":{"code":503,"message":"The model is overloaded."}}"#;
        assert_eq!(
            classify_failure(503, body, "m"),
            GenerationErrorKind::HttpStatus {
                status_code: 503,
                message: "The model is overloaded.".to_string()
            }
        );
        assert_eq!(
            classify_failure(500, "boom", "m"),
            GenerationErrorKind::HttpStatus {
                status_code: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"TITRE GLOBAL : A\n"},{"text":"CHAPITRE 1 : B"}]},"finishReason":"STOP"}]}"#;
        let text = extract_text(body).unwrap();
        assert_eq!(text, "TITRE GLOBAL : A\nCHAPITRE 1 : B");
    }

    #[test]
    fn test_extract_text_reports_safety_block() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let err = extract_text(body).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.user_message(), "Blocage Google : SAFETY");

        let body = r#"{"promptFeedback":{"blockReason":"PROHIBITED_CONTENT"}}"#;
        let err = extract_text(body).unwrap_err();
        assert_eq!(err.user_message(), "Blocage Google : PROHIBITED_CONTENT");
    }

    #[test]
    fn test_extract_text_empty_and_invalid() {
        let err = extract_text(r#"{"candidates":[]}"#).unwrap_err();
        assert_eq!(err.user_message(), "Réponse vide du modèle.");

        let err = extract_text("<html>").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_request_params_override_defaults() {
        let client = GeminiClient::with_api_key("k", &config())
            .unwrap()
            .with_defaults(GenerationParams {
                max_output_tokens: Some(8192),
                temperature: Some(0.7),
                repetition_penalty: None,
            });
        let params = client.effective_params(&GenerationParams {
            temperature: Some(0.2),
            ..Default::default()
        });
        assert_eq!(params.max_output_tokens, Some(8192));
        assert_eq!(params.temperature, Some(0.2));
        assert_eq!(params.repetition_penalty, None);
        assert_eq!(
            client.endpoint("gemini-1.5-flash"),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_uses_gemini_field_names() {
        let body = GenerateContentRequest::new(
            "p",
            &GenerationParams {
                max_output_tokens: Some(10),
                temperature: None,
                repetition_penalty: Some(1.2),
            },
        );
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "p");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 10);
        assert!(json["generationConfig"].get("temperature").is_none());
        assert!(json["generationConfig"]["frequencyPenalty"].is_number());
    }

    #[test]
    fn test_missing_key_variable() {
        let config = config().with_api_key_env("BULLE_TEST_KEY_THAT_IS_NEVER_SET");
        let err = GeminiClient::from_config(&config).unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.user_message(), "API Key not configured.");
    }
}
