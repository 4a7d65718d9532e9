//! Secure API credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of secret keys
//! and ensures memory is zeroed on drop.
//!
//! Two mutually exclusive schemes exist: shared-secret API keys (signed
//! requests) and OAuth2 bearer tokens. A client is constructed with one
//! scheme; the schemes are not combinable.

use crate::error::AuthError;
use crate::nonce::NonceSequence;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

/// Credentials for the API-key scheme.
///
/// The secret key is wrapped in `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
///
/// Clones share the nonce sequence, so signatures produced through any
/// clone remain strictly monotonic.
#[derive(Clone)]
pub struct ApiKeyCredential {
    api_key: String,
    api_secret: SecretString,
    nonce: Arc<NonceSequence>,
}

impl ApiKeyCredential {
    /// Create credentials from explicit values.
    ///
    /// # Errors
    /// Returns `AuthError::MissingCredential` if the key or secret is blank.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Result<Self, AuthError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() {
            return Err(AuthError::MissingCredential("api key"));
        }
        if api_secret.trim().is_empty() {
            return Err(AuthError::MissingCredential("api secret"));
        }

        Ok(Self {
            api_key,
            api_secret: SecretString::from(api_secret),
            nonce: Arc::new(NonceSequence::new()),
        })
    }

    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `COINBASE_API_KEY` - The API key (public)
    /// - `COINBASE_API_SECRET` - The shared secret (private)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is not set.
    pub fn from_env() -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let api_key = std::env::var("COINBASE_API_KEY")
            .map_err(|_| AuthError::MissingEnvVar("COINBASE_API_KEY".into()))?;

        let api_secret = std::env::var("COINBASE_API_SECRET")
            .map_err(|_| AuthError::MissingEnvVar("COINBASE_API_SECRET".into()))?;

        Self::new(api_key, api_secret)
    }

    /// Get the API key (public, safe to log).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Expose the secret key for signing.
    ///
    /// **WARNING**: Only use this for cryptographic operations.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Draw the next signing nonce from the shared sequence.
    pub fn next_nonce(&self) -> u64 {
        self.nonce.next()
    }
}

impl std::fmt::Debug for ApiKeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCredential")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Credentials for the OAuth2 bearer-token scheme.
///
/// The refresh token, client id, and client secret are only needed to
/// recover from an expired access token; a credential built from an
/// access token alone works until the token expires.
#[derive(Clone)]
pub struct OAuthCredential {
    access_token: String,
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
}

impl OAuthCredential {
    /// Create a bearer-only credential.
    ///
    /// # Errors
    /// Returns `AuthError::MissingCredential` if the access token is blank.
    pub fn new(access_token: impl Into<String>) -> Result<Self, AuthError> {
        let access_token = access_token.into();

        if access_token.trim().is_empty() {
            return Err(AuthError::MissingCredential("access token"));
        }

        Ok(Self {
            access_token,
            refresh_token: None,
            client_id: None,
            client_secret: None,
        })
    }

    /// Create a refresh-capable credential.
    ///
    /// # Errors
    /// Returns `AuthError::MissingCredential` if the access token is blank.
    pub fn with_refresh(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let mut credential = Self::new(access_token)?;
        credential.refresh_token = Some(refresh_token.into());
        credential.client_id = Some(client_id.into());
        credential.client_secret = Some(SecretString::from(client_secret.into()));
        Ok(credential)
    }

    /// The current bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The refresh token, if one has been issued.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// OAuth application client id.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Expose the OAuth application client secret for the token endpoint.
    pub fn expose_client_secret(&self) -> Option<&str> {
        self.client_secret.as_ref().map(|s| s.expose_secret())
    }

    /// True when the credential carries everything a refresh exchange needs.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Replace the token pair after a successful refresh exchange.
    ///
    /// Keeps the old refresh token when the endpoint omits a new one.
    pub(crate) fn install_tokens(&mut self, access_token: &str, refresh_token: Option<&str>) {
        self.access_token = access_token.to_string();
        if let Some(refresh) = refresh_token {
            self.refresh_token = Some(refresh.to_string());
        }
    }
}

impl std::fmt::Debug for OAuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredential")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Active authentication scheme for a client.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Shared-secret HMAC request signing.
    ApiKey(ApiKeyCredential),
    /// OAuth2 bearer token.
    OAuth(OAuthCredential),
}

impl Credential {
    /// Scheme name for logging.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::OAuth(_) => "oauth",
        }
    }
}

impl From<ApiKeyCredential> for Credential {
    fn from(credential: ApiKeyCredential) -> Self {
        Self::ApiKey(credential)
    }
}

impl From<OAuthCredential> for Credential {
    fn from(credential: OAuthCredential) -> Self {
        Self::OAuth(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_credential_new() {
        let credential = ApiKeyCredential::new("my_api_key", "my_secret").unwrap();
        assert_eq!(credential.api_key(), "my_api_key");
        assert_eq!(credential.expose_secret(), "my_secret");
    }

    #[test]
    fn test_api_key_credential_rejects_blank() {
        assert!(matches!(
            ApiKeyCredential::new("", "secret"),
            Err(AuthError::MissingCredential("api key"))
        ));
        assert!(matches!(
            ApiKeyCredential::new("key", "   "),
            Err(AuthError::MissingCredential("api secret"))
        ));
    }

    #[test]
    fn test_api_key_debug_redacts_secret() {
        let credential = ApiKeyCredential::new("my_api_key", "super_secret_key").unwrap();
        let debug_str = format!("{:?}", credential);

        assert!(debug_str.contains("my_api_key"));
        assert!(!debug_str.contains("super_secret_key"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_api_key_clones_share_nonce_sequence() {
        let credential = ApiKeyCredential::new("key", "secret").unwrap();
        let clone = credential.clone();

        let first = credential.next_nonce();
        let second = clone.next_nonce();
        let third = credential.next_nonce();

        assert!(second > first);
        assert!(third > second);
    }

    #[test]
    fn test_oauth_credential_new() {
        let credential = OAuthCredential::new("token").unwrap();
        assert_eq!(credential.access_token(), "token");
        assert!(!credential.can_refresh());
    }

    #[test]
    fn test_oauth_credential_rejects_blank_token() {
        assert!(matches!(
            OAuthCredential::new("  "),
            Err(AuthError::MissingCredential("access token"))
        ));
    }

    #[test]
    fn test_oauth_credential_with_refresh() {
        let credential =
            OAuthCredential::with_refresh("token", "refresh", "client-id", "client-secret")
                .unwrap();

        assert!(credential.can_refresh());
        assert_eq!(credential.refresh_token(), Some("refresh"));
        assert_eq!(credential.client_id(), Some("client-id"));
        assert_eq!(credential.expose_client_secret(), Some("client-secret"));
    }

    #[test]
    fn test_oauth_debug_redacts_tokens() {
        let credential =
            OAuthCredential::with_refresh("token-abc", "refresh-def", "client-id", "s3cret")
                .unwrap();
        let debug_str = format!("{:?}", credential);

        assert!(!debug_str.contains("token-abc"));
        assert!(!debug_str.contains("refresh-def"));
        assert!(!debug_str.contains("s3cret"));
        assert!(debug_str.contains("client-id"));
    }

    #[test]
    fn test_install_tokens_keeps_old_refresh_when_absent() {
        let mut credential =
            OAuthCredential::with_refresh("old", "keep-me", "id", "secret").unwrap();

        credential.install_tokens("new", None);

        assert_eq!(credential.access_token(), "new");
        assert_eq!(credential.refresh_token(), Some("keep-me"));
    }

    #[test]
    fn test_credential_scheme_names() {
        let api_key: Credential = ApiKeyCredential::new("k", "s").unwrap().into();
        let oauth: Credential = OAuthCredential::new("t").unwrap().into();

        assert_eq!(api_key.scheme(), "api_key");
        assert_eq!(oauth.scheme(), "oauth");
    }
}
