//! REST transport error types.

use thiserror::Error;

/// Errors that can occur at the HTTP transport layer.
///
/// These are network-level failures; they are never retried here.
/// Application-level errors (non-2xx statuses with an error envelope)
/// are not transport errors and are classified by the caller from the
/// raw response.
#[derive(Debug, Error)]
pub enum RestError {
    /// Request timed out.
    #[error("Request timeout")]
    Timeout,

    /// Connection error (network issue).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Failed to read the response body.
    #[error("Body read error: {0}")]
    Body(String),

    /// Failed to build the HTTP client or request.
    #[error("Request build error: {0}")]
    RequestBuild(String),
}

impl From<reqwest::Error> for RestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RestError::Timeout
        } else if err.is_connect() {
            RestError::Connection(err.to_string())
        } else if err.is_decode() || err.is_body() {
            RestError::Body(err.to_string())
        } else if err.is_builder() {
            RestError::RequestBuild(err.to_string())
        } else {
            RestError::Connection(err.to_string())
        }
    }
}
