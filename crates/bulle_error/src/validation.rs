//! Request validation errors.

/// A required request field is missing or unusable.
///
/// Raised before any generation call is made.
///
/// # Examples
///
/// ```
/// use bulle_error::ValidationError;
///
/// let err = ValidationError::missing("keywords");
/// assert_eq!(err.field, "keywords");
/// assert!(err.message.contains("keywords"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", message, line, file)]
pub struct ValidationError {
    /// Name of the offending field, as it appears in request bodies
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a validation error for `field` with a custom message.
    #[track_caller]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            field: field.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a validation error for a required field that was absent or blank.
    #[track_caller]
    pub fn missing(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("Champ requis manquant : {field}");
        Self::new(field, message)
    }
}
