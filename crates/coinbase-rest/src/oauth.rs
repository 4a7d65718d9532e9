//! OAuth2 token endpoint primitives.
//!
//! Token exchange, refresh, and revocation against `{oauth-base}`.
//! These are the low-level calls; the full browser authorization-code
//! flow is a collaborator's concern.

use crate::error::{classify_error, CoinbaseError};
use model::OAuthTokenResponse;
use rest_client::RestClient;

/// Client for the OAuth token and revocation endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    rest: RestClient,
}

impl OAuthClient {
    pub(crate) fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// The OAuth base URL this client talks to.
    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    /// Exchange an authorization code for a token pair.
    ///
    /// `POST {oauth-base}/token` with `grant_type=authorization_code`.
    pub async fn exchange_code(
        &self,
        code: &str,
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
    ) -> Result<OAuthTokenResponse, CoinbaseError> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", redirect_uri),
        ])
        .await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// `POST {oauth-base}/token` with `grant_type=refresh_token`.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<OAuthTokenResponse, CoinbaseError> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
        .await
    }

    /// Revoke a token.
    ///
    /// `POST {oauth-base}/revoke` authenticated with the bearer token.
    pub async fn revoke(&self, token: &str, bearer: &str) -> Result<(), CoinbaseError> {
        let raw = self
            .rest
            .post_form("/revoke", &[("token", token), ("access_token", bearer)])
            .await?;

        if raw.is_success() {
            tracing::info!("token revoked");
            Ok(())
        } else {
            Err(classify_error(raw.status, &raw.body))
        }
    }

    async fn token_request(
        &self,
        params: &[(&str, &str)],
    ) -> Result<OAuthTokenResponse, CoinbaseError> {
        let raw = self.rest.post_form("/token", params).await?;

        if raw.is_success() {
            serde_json::from_str(&raw.body).map_err(|e| {
                tracing::warn!(error = %e, "failed to parse token response");
                CoinbaseError::Parse(e.to_string())
            })
        } else {
            Err(classify_error(raw.status, &raw.body))
        }
    }
}
