//! Error types for upstream content sources

use thiserror::Error;

/// Errors from fetching upstream content
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),

    /// The request did not complete in time
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection or transport failure
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The upstream answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body was not the expected JSON
    #[error("Could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl UpstreamError {
    /// Classify a reqwest error for `url`
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            UpstreamError::Timeout { url }
        } else if err.is_decode() {
            UpstreamError::Decode {
                url,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            UpstreamError::Request {
                url,
                message: err.to_string(),
            }
        }
    }

}
