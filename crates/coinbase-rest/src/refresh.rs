//! Expired-token recovery.
//!
//! When a request fails with a 401 `expired_token` envelope, the
//! coordinator performs exactly one refresh exchange per expiry, even
//! when many in-flight requests observe the failure at the same time.
//!
//! The single-flight discipline: every failed request funnels through
//! one async mutex. The first holder performs the exchange and installs
//! the new token pair; later holders see that the credential no longer
//! carries the token their request failed with and skip straight to the
//! retry. A refresh failure propagates to the caller and leaves the
//! credential untouched.

use crate::error::CoinbaseError;
use crate::oauth::OAuthClient;
use auth::SharedCredential;
use model::OAuthTokenResponse;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Hook invoked with the new token pair after a successful refresh.
///
/// Runs to completion before the retried request's headers are built,
/// so observers can react to the new token before it is used.
pub type RefreshHook = Arc<dyn Fn(&OAuthTokenResponse) + Send + Sync>;

/// Serializes refresh exchanges for one client.
#[derive(Debug, Default)]
pub(crate) struct RefreshCoordinator {
    gate: Mutex<()>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh unless a concurrent request already did.
    ///
    /// `stale_token` is the access token the failed request was signed
    /// with. Returns `Some` with the endpoint response when this call
    /// performed the exchange, `None` when it was coalesced into an
    /// earlier one.
    pub async fn refresh_if_stale(
        &self,
        credential: &SharedCredential,
        oauth: &OAuthClient,
        stale_token: &str,
        hook: Option<&RefreshHook>,
    ) -> Result<Option<OAuthTokenResponse>, CoinbaseError> {
        let _gate = self.gate.lock().await;

        let already_fresh = credential
            .with_oauth(|c| c.access_token() != stale_token)
            .await?;
        if already_fresh {
            tracing::debug!("access token already refreshed by a concurrent request");
            return Ok(None);
        }

        Self::exchange(credential, oauth, hook).await.map(Some)
    }

    /// Refresh unconditionally (proactive refresh).
    pub async fn force_refresh(
        &self,
        credential: &SharedCredential,
        oauth: &OAuthClient,
        hook: Option<&RefreshHook>,
    ) -> Result<OAuthTokenResponse, CoinbaseError> {
        let _gate = self.gate.lock().await;
        Self::exchange(credential, oauth, hook).await
    }

    async fn exchange(
        credential: &SharedCredential,
        oauth: &OAuthClient,
        hook: Option<&RefreshHook>,
    ) -> Result<OAuthTokenResponse, CoinbaseError> {
        let (refresh_token, client_id, client_secret) = credential
            .with_oauth(|c| {
                (
                    c.refresh_token().map(str::to_string),
                    c.client_id().map(str::to_string),
                    c.expose_client_secret().map(str::to_string),
                )
            })
            .await?;

        let refresh_token =
            refresh_token.ok_or(CoinbaseError::RefreshUnavailable("a refresh token"))?;
        let client_id = client_id.ok_or(CoinbaseError::RefreshUnavailable("a client id"))?;
        let client_secret =
            client_secret.ok_or(CoinbaseError::RefreshUnavailable("a client secret"))?;

        // On failure the error propagates here and the credential keeps
        // its current tokens.
        let tokens = oauth
            .refresh(&refresh_token, &client_id, &client_secret)
            .await?;

        credential
            .install_tokens(&tokens.access_token, tokens.refresh_token.as_deref())
            .await?;
        tracing::info!("access token refreshed");

        if let Some(hook) = hook {
            hook(&tokens);
        }

        Ok(tokens)
    }
}
