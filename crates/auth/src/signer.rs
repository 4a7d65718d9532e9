//! Request signing and webhook signature verification.
//!
//! Two independent primitives live here:
//!
//! - HMAC-SHA256 signing of outbound requests under the API-key scheme.
//! - RSA-SHA256 verification of inbound webhook notifications.
//!
//! Both are pure functions over caller-supplied inputs.

use crate::error::AuthError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Sign an outbound request under the API-key scheme.
///
/// Computes HMAC-SHA256 over the byte concatenation
/// `timestamp + method + url + body` (exact order, no delimiters) keyed
/// by the API secret, and returns the lowercase hex encoding.
///
/// `timestamp` carries the nonce value; callers must guarantee
/// monotonic, non-repeating nonces per credential (see
/// [`crate::NonceSequence`]). Deterministic: identical inputs always
/// produce the same 64-character signature.
pub fn sign_request(timestamp: &str, method: &str, url: &str, body: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(url.as_bytes());
    mac.update(body.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Verify an RSA-SHA256 signature over a raw webhook body.
///
/// Base64-decodes the signature, hashes the body with SHA-256, and
/// verifies RSASSA-PKCS1-v1_5 against the given public key. Fails
/// closed: a malformed signature, a truncated signature, or any byte
/// mutation in the body yields an error, never a silent accept.
pub fn verify_rsa_sha256(
    body: &[u8],
    signature_b64: &str,
    public_key: &RsaPublicKey,
) -> Result<(), AuthError> {
    let signature = BASE64
        .decode(signature_b64)
        .map_err(|e| AuthError::SignatureDecode(e.to_string()))?;

    let digest = Sha256::digest(body);

    public_key
        .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, &signature)
        .map_err(|_| AuthError::InvalidSignature)
}
