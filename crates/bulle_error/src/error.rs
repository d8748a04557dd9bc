//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, GenerationError, HttpError, JsonError, ValidationError};

/// Every error condition the Bulle crates can raise.
///
/// # Examples
///
/// ```
/// use bulle_error::{BulleError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: BulleError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BulleErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Request validation error
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Generation backend error
    #[from(GenerationError)]
    Generation(GenerationError),
}

/// Bulle error with kind discrimination.
///
/// # Examples
///
/// ```
/// use bulle_error::{BulleError, BulleResult, ConfigError};
///
/// fn might_fail() -> BulleResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Bulle Error: {}", _0)]
pub struct BulleError(Box<BulleErrorKind>);

impl BulleError {
    /// Create a new error from a kind.
    pub fn new(kind: BulleErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BulleErrorKind {
        &self.0
    }

    /// HTTP status code suited to this error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            BulleErrorKind::Validation(_) => 400,
            BulleErrorKind::Generation(e) => e.kind.status_code(),
            BulleErrorKind::Json(_) => 400,
            _ => 500,
        }
    }

    /// Human-readable message suited to end users.
    ///
    /// # Examples
    ///
    /// ```
    /// use bulle_error::{BulleError, ValidationError};
    ///
    /// let err: BulleError = ValidationError::missing("genre").into();
    /// assert_eq!(err.status_code(), 400);
    /// assert!(err.user_message().contains("genre"));
    /// ```
    pub fn user_message(&self) -> String {
        match self.kind() {
            BulleErrorKind::Validation(e) => e.message.clone(),
            BulleErrorKind::Generation(e) => e.kind.user_message(),
            BulleErrorKind::Json(e) => e.message.clone(),
            BulleErrorKind::Http(e) => e.message.clone(),
            BulleErrorKind::Config(e) => e.message.clone(),
            BulleErrorKind::Builder(e) => e.kind().to_string(),
        }
    }
}

// Generic From implementation for any type that converts to BulleErrorKind
impl<T> From<T> for BulleError
where
    T: Into<BulleErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Bulle operations.
pub type BulleResult<T> = std::result::Result<T, BulleError>;
