//! Validation errors for inbound payloads

use thiserror::Error;

/// Errors raised while validating client-supplied data
///
/// These are always the caller's fault and map to a 4xx response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Query was empty or whitespace only
    #[error("Invalid query")]
    EmptyQuery,

    /// A required field was absent or empty
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Action was not one of the known analytics actions
    #[error("Unknown analytics action: {0}")]
    UnknownAction(String),

    /// Slug is not in the WordPress slug alphabet
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Timestamp could not be parsed as RFC 3339
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Body was not the expected JSON shape
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Create a new Malformed error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}
