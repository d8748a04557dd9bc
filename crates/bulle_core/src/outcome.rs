//! Soft parse failures.
//!
//! A generation call that succeeded but produced text without any recognizable
//! structure is not an error of the stage: the raw text travels back to the
//! caller next to a message so it can still be shown.

use serde::{Deserialize, Serialize};

/// Raw text that could not be turned into records.
///
/// # Examples
///
/// ```
/// use bulle_core::ParseFailure;
///
/// let failure = ParseFailure::new("Bonjour.", "Parsing failed: No panels parsed.");
/// let json = serde_json::to_value(&failure).unwrap();
/// assert_eq!(json["rawText"], "Bonjour.");
/// assert_eq!(json["parsingError"], "Parsing failed: No panels parsed.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "camelCase")]
#[display("{}", parsing_error)]
pub struct ParseFailure {
    /// The unparsed text, verbatim
    pub raw_text: String,
    /// Why nothing could be extracted
    pub parsing_error: String,
}

impl ParseFailure {
    /// Create a parse failure carrying `raw_text` verbatim.
    pub fn new(raw_text: impl Into<String>, parsing_error: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            parsing_error: parsing_error.into(),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Result of a parser: records, or the raw text with a reason.
pub type ParseResult<T> = Result<T, ParseFailure>;

/// Transport form of a [`ParseResult`].
///
/// Serializes untagged, so a parsed value appears as itself and a failure as
/// `{ "rawText": ..., "parsingError": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseOutcome<T> {
    /// Structured records
    Parsed(T),
    /// Unparsed text
    Unparsed(ParseFailure),
}

impl<T> ParseOutcome<T> {
    /// Structured value, if parsing succeeded.
    pub fn parsed(&self) -> Option<&T> {
        match self {
            ParseOutcome::Parsed(value) => Some(value),
            ParseOutcome::Unparsed(_) => None,
        }
    }

    /// Failure, if parsing found nothing.
    pub fn failure(&self) -> Option<&ParseFailure> {
        match self {
            ParseOutcome::Parsed(_) => None,
            ParseOutcome::Unparsed(failure) => Some(failure),
        }
    }

    /// Convert back into a result.
    pub fn into_result(self) -> ParseResult<T> {
        match self {
            ParseOutcome::Parsed(value) => Ok(value),
            ParseOutcome::Unparsed(failure) => Err(failure),
        }
    }
}

impl<T> From<ParseResult<T>> for ParseOutcome<T> {
    fn from(result: ParseResult<T>) -> Self {
        match result {
            Ok(value) => ParseOutcome::Parsed(value),
            Err(failure) => ParseOutcome::Unparsed(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_untagged() {
        let parsed: ParseOutcome<Vec<u32>> = Ok(vec![1, 2]).into();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "[1,2]");

        let failed: ParseOutcome<Vec<u32>> = Err(ParseFailure::new("x", "nothing")).into();
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["rawText"], "x");
        assert!(failed.parsed().is_none());
    }

    #[test]
    fn test_outcome_deserializes_failure_shape() {
        let outcome: ParseOutcome<Vec<u32>> =
            serde_json::from_str(r#"{"rawText":"abc","parsingError":"none"}"#).unwrap();
        assert_eq!(outcome.failure().map(|f| f.raw_text.as_str()), Some("abc"));
    }
}
