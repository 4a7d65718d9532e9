//! Wire types for the Coinbase REST API.
//!
//! Every v2 endpoint wraps its payload in a common JSON envelope:
//!
//! ```json
//! {
//!   "data": { ... },
//!   "pagination": { "next_uri": "/v2/accounts?starting_after=..." },
//!   "errors": [ { "id": "expired_token", "message": "..." } ],
//!   "warnings": [ ... ]
//! }
//! ```
//!
//! This crate holds the envelope, pagination cursor, error entries, and
//! the OAuth token endpoint response. Pure data, no I/O.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known error identifiers returned by the API.
pub mod error_ids {
    /// The access token has expired and must be refreshed.
    pub const EXPIRED_TOKEN: &str = "expired_token";
    /// The token lacks the scope required for the operation.
    pub const INVALID_SCOPE: &str = "invalid_scope";
    /// The operation requires a two-factor confirmation round-trip.
    pub const TWO_FACTOR_REQUIRED: &str = "two_factor_required";
}

/// Common response envelope wrapping every API payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// The payload, absent on error responses.
    #[serde(default)]
    pub data: Option<T>,
    /// Pagination cursors, present on list endpoints.
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Ordered list of errors; empty on success.
    #[serde(default)]
    pub errors: Vec<ErrorEntry>,
    /// Non-fatal warnings attached to an otherwise successful response.
    #[serde(default)]
    pub warnings: Vec<ErrorEntry>,
}

impl<T> Envelope<T> {
    /// Consume the envelope, yielding the payload if present.
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// True if the error list contains the given well-known id.
    pub fn has_error(&self, id: &str) -> bool {
        self.errors.iter().any(|e| e.id == id)
    }

    /// Opaque locator for the next page, if any.
    ///
    /// Blank strings are treated as absent so callers can rely on
    /// `None` meaning "no further pages".
    pub fn next_uri(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.next_uri.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Opaque locator for the previous page, if any.
    pub fn previous_uri(&self) -> Option<&str> {
        self.pagination
            .as_ref()
            .and_then(|p| p.previous_uri.as_deref())
            .filter(|u| !u.is_empty())
    }
}

/// A single error or warning entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Machine-readable identifier, e.g. `expired_token`.
    pub id: String,
    /// Human-readable description.
    pub message: String,
    /// Optional documentation link.
    #[serde(default)]
    pub url: Option<String>,
}

/// Pagination cursors returned by list endpoints.
///
/// `next_uri` and `previous_uri` are complete relative paths including
/// the query string. They must be replayed against the API base URL
/// verbatim, never re-derived from `limit`/`order`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub ending_before: Option<String>,
    #[serde(default)]
    pub starting_after: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub order: Option<Order>,
    #[serde(default)]
    pub previous_uri: Option<String>,
    #[serde(default)]
    pub next_uri: Option<String>,
}

/// Sort order for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Order {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub limit: Option<u32>,
    pub order: Option<Order>,
    pub starting_after: Option<String>,
    pub ending_before: Option<String>,
}

impl ListParams {
    /// Render as a query string without the leading `?`.
    ///
    /// Returns an empty string when no parameter is set.
    pub fn to_query(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(limit) = self.limit {
            parts.push(format!("limit={}", limit));
        }
        if let Some(order) = self.order {
            parts.push(format!("order={}", order));
        }
        if let Some(after) = &self.starting_after {
            parts.push(format!("starting_after={}", after));
        }
        if let Some(before) = &self.ending_before {
            parts.push(format!("ending_before={}", before));
        }

        parts.join("&")
    }
}

/// Response from the OAuth token endpoint.
///
/// Produced by both the authorization-code exchange and the
/// refresh-token grant. Immutable value.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: u64,
    /// Unix epoch seconds at which the token was issued.
    pub created_at: i64,
}

impl OAuthTokenResponse {
    /// Unix epoch seconds at which the access token expires.
    pub fn expires_at(&self) -> i64 {
        self.created_at + self.expires_in as i64
    }

    /// Issuance time as a UTC timestamp.
    ///
    /// `None` if `created_at` is outside the representable range.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.created_at, 0).single()
    }

    /// Expiry time as a UTC timestamp.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expires_at(), 0).single()
    }

    /// True if the token is expired at the given epoch second.
    pub fn is_expired_at(&self, now_epoch: i64) -> bool {
        now_epoch >= self.expires_at()
    }
}
