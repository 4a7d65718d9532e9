//! Coinbase API error types and response classification.

use auth::AuthError;
use model::{error_ids, Envelope, ErrorEntry};
use rest_client::RestError;
use thiserror::Error;

/// Errors that can occur when interacting with the Coinbase REST API.
#[derive(Debug, Error)]
pub enum CoinbaseError {
    /// Transport error (network, timeout, etc.). Never retried here.
    #[error("REST client error: {0}")]
    Rest(#[from] RestError),

    /// Credential configuration error.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The access token expired and could not be recovered.
    ///
    /// Surfaced only when the credential cannot refresh, or when the
    /// retried request expired again.
    #[error("Access token expired")]
    ExpiredToken,

    /// The token lacks the scope required for the operation.
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// The operation requires a two-factor confirmation.
    #[error("Two-factor authentication required: {0}")]
    TwoFactorRequired(String),

    /// The OAuth credential is missing a field the refresh exchange needs.
    #[error("OAuth credential is missing {0}; cannot refresh")]
    RefreshUnavailable(&'static str),

    /// Any other API error, carrying the status and full error list.
    #[error("API error {status}: {}", summary(.errors))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Ordered error entries from the response envelope.
        errors: Vec<ErrorEntry>,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

fn summary(errors: &[ErrorEntry]) -> &str {
    errors.first().map_or("unknown error", |e| e.message.as_str())
}

/// Classify a non-2xx response into a typed error.
///
/// The refresh trigger is strict: the status must be 401 *and* the
/// envelope must contain an `expired_token` entry. `invalid_scope` and
/// `two_factor_required` are distinguished so callers can react, and
/// must never enter the refresh path. A malformed envelope is a plain
/// API error carrying the raw status.
pub(crate) fn classify_error(status: u16, body: &str) -> CoinbaseError {
    let errors = match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(envelope) if !envelope.errors.is_empty() => envelope.errors,
        _ => {
            return CoinbaseError::Api {
                status,
                errors: Vec::new(),
            }
        }
    };

    if status == 401 && errors.iter().any(|e| e.id == error_ids::EXPIRED_TOKEN) {
        return CoinbaseError::ExpiredToken;
    }

    if let Some(entry) = errors.iter().find(|e| e.id == error_ids::INVALID_SCOPE) {
        return CoinbaseError::InvalidScope(entry.message.clone());
    }

    if let Some(entry) = errors
        .iter()
        .find(|e| e.id == error_ids::TWO_FACTOR_REQUIRED)
    {
        return CoinbaseError::TwoFactorRequired(entry.message.clone());
    }

    CoinbaseError::Api { status, errors }
}
