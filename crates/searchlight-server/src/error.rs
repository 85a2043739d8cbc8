//! HTTP error types for the server

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use searchlight_core::ValidationError;
use searchlight_storage::StorageError;
use searchlight_upstream::UpstreamError;
use thiserror::Error;

/// Error wrapper for converting failures to HTTP responses
///
/// Error responses have the format:
/// ```json
/// { "error": "..." }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A feed the endpoint exists to serve could not be fetched
    #[error("failed to fetch {what}: {source}")]
    Fetch {
        what: &'static str,
        #[source]
        source: UpstreamError,
    },
}

impl ApiError {
    pub fn fetch(what: &'static str, source: UpstreamError) -> Self {
        ApiError::Fetch { what, source }
    }

    /// Status code for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Fetch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to callers
    ///
    /// Validation messages describe the caller's input; storage and
    /// upstream details stay in the server logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(e) => e.to_string(),
            ApiError::Storage(_) => "Storage unavailable".to_string(),
            ApiError::Fetch { what, .. } => format!("Failed to fetch {what}"),
        }
    }

    fn log(&self) {
        match self {
            ApiError::Validation(e) => tracing::debug!(error = %e, "Rejected request"),
            ApiError::Storage(e) => tracing::error!(error = %e, "Storage failure"),
            ApiError::Fetch { what, source } => {
                tracing::warn!(error = %source, what, "Feed fetch failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let body = serde_json::json!({ "error": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}

/// Error for acknowledgement-style endpoints
///
/// Responds with:
/// ```json
/// { "success": false, "message": "..." }
/// ```
/// where a server-side failure uses `fallback` as the message.
#[derive(Debug)]
pub struct AckError {
    pub error: ApiError,
    pub fallback: &'static str,
}

impl AckError {
    pub fn new(error: impl Into<ApiError>, fallback: &'static str) -> Self {
        Self {
            error: error.into(),
            fallback,
        }
    }
}

impl IntoResponse for AckError {
    fn into_response(self) -> Response {
        self.error.log();
        let status = self.error.status();
        let message = if status.is_client_error() {
            self.error.public_message()
        } else {
            self.fallback.to_string()
        };
        let body = serde_json::json!({ "success": false, "message": message });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ValidationError::EmptyQuery).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StorageError::unavailable("down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_hidden() {
        let err = ApiError::from(StorageError::io("/secret/path: permission denied"));
        assert_eq!(err.public_message(), "Storage unavailable");
    }

    #[test]
    fn test_validation_message_shown() {
        let err = ApiError::from(ValidationError::EmptyQuery);
        assert_eq!(err.public_message(), "Invalid query");
    }

    #[test]
    fn test_fetch_names_the_feed() {
        let err = ApiError::fetch(
            "blog posts",
            UpstreamError::Request {
                url: "http://wp.internal/posts".to_string(),
                message: "connection refused".to_string(),
            },
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to fetch blog posts");
    }
}
