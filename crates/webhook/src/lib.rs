//! Verification of inbound webhook notifications.
//!
//! The service signs every notification it POSTs: the `CB-SIGNATURE`
//! header carries a base64 RSA-SHA256 signature over the raw request
//! body. Receivers verify against the service's published public key
//! before trusting the payload.
//!
//! # Example
//!
//! ```rust,ignore
//! use webhook::{WebhookVerifier, SIGNATURE_HEADER};
//!
//! let verifier = WebhookVerifier::from_pem(PUBLIC_KEY_PEM)?;
//!
//! // In the HTTP handler, before parsing the body:
//! verifier.verify(raw_body, signature_header)?;
//! ```

mod error;
mod verifier;

pub use error::WebhookError;
pub use verifier::{WebhookVerifier, SIGNATURE_HEADER};
