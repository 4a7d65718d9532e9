//! Generic REST transport infrastructure.
//!
//! This crate provides a thin wrapper around `reqwest` with:
//!
//! - Consistent error handling via `RestError`
//! - Raw status + body capture so callers classify API errors themselves
//! - Header injection for authentication
//! - Form-encoded POST support for token endpoints
//! - Configurable request timeout
//!
//! No retries happen at this layer; transport failures surface
//! immediately and dropping a returned future cancels the request.
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::RestClient;
//! use reqwest::Method;
//!
//! let client = RestClient::with_default_timeout("https://api.coinbase.com")?;
//! let response = client.send(Method::GET, "/v2/time", None, None, &[]).await?;
//! assert!(response.is_success());
//! ```

mod client;
mod error;

pub use client::{RawResponse, RestClient};
pub use error::RestError;

// Callers name methods through the same reqwest the transport uses.
pub use reqwest::Method;
