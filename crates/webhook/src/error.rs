use thiserror::Error;

/// Errors that can occur when verifying a webhook notification.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The configured public key could not be parsed.
    #[error("Invalid public key: {0}")]
    InvalidKey(String),

    /// The signature is malformed or does not match the payload.
    ///
    /// Deliberately a single variant: callers must reject the webhook
    /// whether the signature failed to decode or failed to verify, and
    /// the distinction is an attacker-controlled detail.
    #[error("Webhook signature verification failed")]
    BadSignature,
}
