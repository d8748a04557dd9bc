//! Generation collaborator failures.

/// Failure conditions reported by a text-generation backend.
///
/// None of these are retried: the stage that hit one surfaces it to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in the configured environment variable
    #[display("API key not configured (environment variable {})", _0)]
    MissingApiKey(String),
    /// Prompt or response rejected by the provider's content policy
    #[display("Content blocked by provider: {}", _0)]
    Blocked(String),
    /// Provider rejected the credential
    #[display("API key not valid")]
    InvalidCredential,
    /// Requested model does not exist
    #[display("Model not found: {}", _0)]
    ModelNotFound(String),
    /// Provider quota or rate limit reached
    #[display("Rate limited by provider")]
    RateLimited,
    /// No answer within the allotted time
    #[display("Generation timed out after {}s", _0)]
    Timeout(u64),
    /// Connection-level failure before a response was received
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Any other non-success HTTP status
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Provider answered successfully but returned no text
    #[display("Provider returned an empty response")]
    EmptyResponse,
}

impl GenerationErrorKind {
    /// HTTP status code a caller should surface for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationErrorKind::MissingApiKey(_) => 500,
            GenerationErrorKind::Blocked(_) => 400,
            GenerationErrorKind::InvalidCredential => 500,
            GenerationErrorKind::ModelNotFound(_) => 404,
            GenerationErrorKind::RateLimited => 429,
            GenerationErrorKind::Timeout(_) => 504,
            GenerationErrorKind::Transport(_) => 502,
            GenerationErrorKind::HttpStatus { status_code, .. } => *status_code,
            GenerationErrorKind::EmptyResponse => 502,
        }
    }

    /// Message shown to end users, one per failure kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulle_error::GenerationErrorKind;
    ///
    /// let kind = GenerationErrorKind::Blocked("SAFETY".to_string());
    /// assert_eq!(kind.user_message(), "Blocage Google : SAFETY");
    /// assert_eq!(kind.status_code(), 400);
    /// ```
    pub fn user_message(&self) -> String {
        match self {
            GenerationErrorKind::MissingApiKey(_) => "API Key not configured.".to_string(),
            GenerationErrorKind::Blocked(reason) => format!("Blocage Google : {reason}"),
            GenerationErrorKind::InvalidCredential => "Clé API invalide.".to_string(),
            GenerationErrorKind::ModelNotFound(model) => format!("Modèle non trouvé: {model}"),
            GenerationErrorKind::RateLimited => {
                "Quota de requêtes atteint, réessayez plus tard.".to_string()
            }
            GenerationErrorKind::Timeout(secs) => {
                format!("Délai de génération dépassé ({secs}s).")
            }
            GenerationErrorKind::Transport(message) => format!("API call failed: {message}"),
            GenerationErrorKind::HttpStatus { message, .. } => format!("Erreur API: {message}"),
            GenerationErrorKind::EmptyResponse => "Réponse vide du modèle.".to_string(),
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use bulle_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::ModelNotFound("gemini-0".into()));
/// assert_eq!(err.kind.status_code(), 404);
/// assert!(format!("{}", err).contains("gemini-0"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_failure_kind() {
        assert_eq!(GenerationErrorKind::InvalidCredential.status_code(), 500);
        assert_eq!(GenerationErrorKind::RateLimited.status_code(), 429);
        assert_eq!(GenerationErrorKind::Timeout(30).status_code(), 504);
        let upstream = GenerationErrorKind::HttpStatus {
            status_code: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(upstream.status_code(), 503);
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let kinds = [
            GenerationErrorKind::Blocked("OTHER".to_string()),
            GenerationErrorKind::InvalidCredential,
            GenerationErrorKind::ModelNotFound("m".to_string()),
            GenerationErrorKind::RateLimited,
            GenerationErrorKind::Transport("reset".to_string()),
        ];
        let messages: std::collections::HashSet<String> =
            kinds.iter().map(|k| k.user_message()).collect();
        assert_eq!(messages.len(), kinds.len());
        assert_eq!(GenerationErrorKind::InvalidCredential.user_message(), "Clé API invalide.");
    }
}
