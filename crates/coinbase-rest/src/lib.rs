//! Coinbase REST API client core.
//!
//! This crate provides the authenticated request pipeline shared by
//! every endpoint:
//!
//! - **Two auth schemes**: HMAC-signed API-key requests and OAuth2
//!   bearer tokens, selected at client construction
//! - **Expired-token recovery**: a 401 `expired_token` response triggers
//!   exactly one refresh exchange (coalesced across concurrent
//!   failures) and a single retry of the original request
//! - **Cursor pagination**: opaque `next_uri`/`previous_uri` locators
//!   replayed verbatim through the same pipeline
//! - **OAuth primitives**: authorization-code exchange, refresh, revoke
//!
//! Per-resource endpoint methods are thin consumers of [`CoinbaseClient`]
//! and live outside this crate.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::OAuthCredential;
//! use coinbase_rest::CoinbaseClient;
//!
//! let credential = OAuthCredential::with_refresh(access, refresh, id, secret)?;
//! let client = CoinbaseClient::new(credential)?;
//!
//! let mut page = client.get::<Vec<Account>>("/v2/accounts", None).await?;
//! while let Some(next) = client.next_page(&page).await? {
//!     page = next;
//! }
//! ```

mod client;
mod error;
mod headers;
mod oauth;
mod refresh;

pub use client::CoinbaseClient;
pub use error::CoinbaseError;
pub use headers::{
    ACCESS_KEY_HEADER, ACCESS_SIGN_HEADER, ACCESS_TIMESTAMP_HEADER, API_VERSION,
    AUTHORIZATION_HEADER, USER_AGENT, USER_AGENT_HEADER, VERSION_HEADER,
};
pub use oauth::OAuthClient;
pub use refresh::RefreshHook;

// Wire types, re-exported for consumers of the envelope.
pub use model::{error_ids, Envelope, ErrorEntry, ListParams, OAuthTokenResponse, Order, Pagination};
