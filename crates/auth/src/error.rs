use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// A required credential field is blank.
    #[error("Missing credential field: {0}")]
    MissingCredential(&'static str),

    /// The credential scheme has no refresh token to exchange.
    #[error("Credential scheme does not support token refresh")]
    NotRefreshable,

    /// A webhook signature was not valid base64.
    #[error("Signature is not valid base64: {0}")]
    SignatureDecode(String),

    /// A webhook signature did not match the payload.
    #[error("Signature verification failed")]
    InvalidSignature,
}
