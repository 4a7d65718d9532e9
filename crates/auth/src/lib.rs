//! Authentication and signing for the Coinbase API.
//!
//! This crate provides secure credential management and the two signing
//! primitives the client core is built on.
//!
//! # Features
//!
//! - **Secure Credentials**: API secrets are wrapped in `SecretString` to prevent
//!   accidental logging and ensure memory is zeroed on drop.
//! - **Two schemes**: shared-secret API keys (HMAC-SHA256 request signing with
//!   monotonic nonces) and OAuth2 bearer tokens (refreshable in place through
//!   [`SharedCredential`]).
//! - **Webhook verification**: RSA-SHA256 signature checking for inbound
//!   notifications, failing closed on any mismatch.
//! - **Environment Loading**: API-key credentials can be loaded from environment
//!   variables or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{ApiKeyCredential, sign_request};
//!
//! let credential = ApiKeyCredential::from_env()?;
//!
//! let nonce = credential.next_nonce().to_string();
//! let signature = sign_request(
//!     &nonce,
//!     "GET",
//!     "https://api.coinbase.com/v2/accounts",
//!     "",
//!     credential.expose_secret(),
//! );
//! ```

mod credentials;
mod error;
mod nonce;
mod shared;
mod signer;

pub use credentials::{ApiKeyCredential, Credential, OAuthCredential};
pub use error::AuthError;
pub use nonce::NonceSequence;
pub use shared::SharedCredential;
pub use signer::{sign_request, verify_rsa_sha256};

// Re-exported so webhook consumers can name the key type without
// depending on the rsa crate directly.
pub use rsa::RsaPublicKey;
