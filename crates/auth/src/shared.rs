//! Shared mutable credential state.
//!
//! One credential instance is referenced by every in-flight request on a
//! client; the refresh protocol mutates the token fields in place. The
//! wrapper serializes access so readers always observe a consistent
//! (non-torn) value and writers swap the token pair atomically.

use crate::credentials::{Credential, OAuthCredential};
use crate::error::AuthError;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Exclusive-access wrapper around the client's [`Credential`].
///
/// Cheap to clone; all clones refer to the same underlying state.
#[derive(Debug, Clone)]
pub struct SharedCredential {
    inner: Arc<RwLock<Credential>>,
}

impl SharedCredential {
    /// Wrap a credential for shared use.
    pub fn new(credential: impl Into<Credential>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credential.into())),
        }
    }

    /// Take a consistent snapshot of the current credential state.
    ///
    /// Header construction works from a snapshot so a concurrent refresh
    /// can never produce a half-updated signature.
    pub async fn snapshot(&self) -> Credential {
        self.inner.read().await.clone()
    }

    /// The current bearer token, if the OAuth scheme is active.
    pub async fn bearer_token(&self) -> Option<String> {
        match &*self.inner.read().await {
            Credential::OAuth(credential) => Some(credential.access_token().to_string()),
            Credential::ApiKey(_) => None,
        }
    }

    /// Atomically replace the OAuth token pair after a refresh exchange.
    ///
    /// Keeps the existing refresh token when `refresh_token` is `None`.
    ///
    /// # Errors
    /// Returns `AuthError::NotRefreshable` if the API-key scheme is active.
    pub async fn install_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        let mut guard = self.inner.write().await;
        match &mut *guard {
            Credential::OAuth(credential) => {
                credential.install_tokens(access_token, refresh_token);
                Ok(())
            }
            Credential::ApiKey(_) => Err(AuthError::NotRefreshable),
        }
    }

    /// Run a closure against the current OAuth credential, if active.
    pub async fn with_oauth<R>(
        &self,
        f: impl FnOnce(&OAuthCredential) -> R,
    ) -> Result<R, AuthError> {
        match &*self.inner.read().await {
            Credential::OAuth(credential) => Ok(f(credential)),
            Credential::ApiKey(_) => Err(AuthError::NotRefreshable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::ApiKeyCredential;

    #[tokio::test]
    async fn test_install_tokens_swaps_pair() {
        let shared = SharedCredential::new(
            OAuthCredential::with_refresh("old-access", "old-refresh", "id", "secret").unwrap(),
        );

        shared
            .install_tokens("new-access", Some("new-refresh"))
            .await
            .unwrap();

        assert_eq!(shared.bearer_token().await.as_deref(), Some("new-access"));
        let refresh = shared
            .with_oauth(|c| c.refresh_token().map(str::to_string))
            .await
            .unwrap();
        assert_eq!(refresh.as_deref(), Some("new-refresh"));
    }

    #[tokio::test]
    async fn test_install_tokens_rejects_api_key_scheme() {
        let shared = SharedCredential::new(ApiKeyCredential::new("k", "s").unwrap());

        let result = shared.install_tokens("token", None).await;
        assert!(matches!(result, Err(AuthError::NotRefreshable)));
        assert!(shared.bearer_token().await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_is_detached_from_updates() {
        let shared = SharedCredential::new(OAuthCredential::new("before").unwrap());

        let snapshot = shared.snapshot().await;
        shared.install_tokens("after", None).await.unwrap();

        match snapshot {
            Credential::OAuth(credential) => assert_eq!(credential.access_token(), "before"),
            Credential::ApiKey(_) => panic!("wrong scheme"),
        }
        assert_eq!(shared.bearer_token().await.as_deref(), Some("after"));
    }
}
