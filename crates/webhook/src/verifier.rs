//! Webhook notification verification.

use crate::error::WebhookError;
use auth::{verify_rsa_sha256, RsaPublicKey};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;

/// Header carrying the base64 RSA-SHA256 signature over the raw POST body.
pub const SIGNATURE_HEADER: &str = "CB-SIGNATURE";

/// Verifies the authenticity of inbound webhook notifications.
///
/// Built once at startup from the service's published public key and
/// shared process-wide; the key never changes at runtime.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    public_key: RsaPublicKey,
}

impl WebhookVerifier {
    /// Build a verifier from a PEM-encoded RSA public key.
    ///
    /// Accepts both SPKI (`BEGIN PUBLIC KEY`) and PKCS#1
    /// (`BEGIN RSA PUBLIC KEY`) encodings.
    pub fn from_pem(pem: &str) -> Result<Self, WebhookError> {
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| WebhookError::InvalidKey(e.to_string()))?;

        Ok(Self { public_key })
    }

    /// Build a verifier from an already-parsed key.
    pub fn new(public_key: RsaPublicKey) -> Self {
        Self { public_key }
    }

    /// Verify the signature over the raw request body.
    ///
    /// `body` must be the exact bytes of the POST body, before any JSON
    /// parsing or re-serialization. Fails closed: a decode error, a
    /// truncated signature, or any byte mutation in the body is
    /// rejected. Callers must respond with an error status instead of
    /// trusting unverified data.
    pub fn verify(&self, body: &[u8], signature_b64: &str) -> Result<(), WebhookError> {
        verify_rsa_sha256(body, signature_b64, &self.public_key).map_err(|e| {
            tracing::warn!(error = %e, "rejected webhook notification");
            WebhookError::BadSignature
        })
    }

    /// Convenience predicate over [`verify`](Self::verify).
    pub fn is_valid(&self, body: &[u8], signature_b64: &str) -> bool {
        self.verify(body, signature_b64).is_ok()
    }
}
