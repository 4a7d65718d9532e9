//! Coinbase REST API client.

use crate::error::{classify_error, CoinbaseError};
use crate::headers::build_headers;
use crate::oauth::OAuthClient;
use crate::refresh::{RefreshCoordinator, RefreshHook};
use auth::{Credential, SharedCredential};
use common::Environment;
use model::{Envelope, OAuthTokenResponse};
use rest_client::{Method, RawResponse, RestClient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Request timeout for Coinbase API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Coinbase REST API client with authentication support.
///
/// One instance owns one credential; concurrent calls share it. An
/// expired OAuth access token is recovered transparently: the failing
/// request triggers a single refresh exchange (coalesced across
/// concurrent failures) and is retried exactly once.
pub struct CoinbaseClient {
    rest: RestClient,
    oauth: OAuthClient,
    credential: SharedCredential,
    refresh: RefreshCoordinator,
    on_refresh: Option<RefreshHook>,
}

impl CoinbaseClient {
    /// Create a client for production.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credential: impl Into<Credential>) -> Result<Self, CoinbaseError> {
        Self::with_environment(credential, Environment::Production)
    }

    /// Create a client for a specific environment.
    pub fn with_environment(
        credential: impl Into<Credential>,
        environment: Environment,
    ) -> Result<Self, CoinbaseError> {
        Self::with_urls(
            credential,
            environment.api_base_url(),
            environment.oauth_base_url(),
        )
    }

    /// Create a client against explicit base URLs.
    ///
    /// Integration tests point this at a local mock server.
    pub fn with_urls(
        credential: impl Into<Credential>,
        api_url: &str,
        oauth_url: &str,
    ) -> Result<Self, CoinbaseError> {
        Self::with_urls_and_timeout(credential, api_url, oauth_url, REQUEST_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_urls_and_timeout(
        credential: impl Into<Credential>,
        api_url: &str,
        oauth_url: &str,
        timeout: Duration,
    ) -> Result<Self, CoinbaseError> {
        let credential = credential.into();
        tracing::debug!(scheme = credential.scheme(), api_url, "creating client");

        Ok(Self {
            rest: RestClient::new(api_url, timeout)?,
            oauth: OAuthClient::new(RestClient::new(oauth_url, timeout)?),
            credential: SharedCredential::new(credential),
            refresh: RefreshCoordinator::new(),
            on_refresh: None,
        })
    }

    /// Register a hook to observe refreshed tokens.
    ///
    /// The hook completes before the retried request is signed, so it
    /// can persist or inspect the new pair first.
    pub fn on_refresh(mut self, hook: RefreshHook) -> Self {
        self.on_refresh = Some(hook);
        self
    }

    /// The shared credential this client signs with.
    pub fn credential(&self) -> &SharedCredential {
        &self.credential
    }

    /// The OAuth endpoint client (code exchange, refresh, revoke).
    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    // ========================================================================
    // Request pipeline
    // ========================================================================

    /// Make a GET request.
    ///
    /// # Arguments
    /// * `path` - Request path (e.g., "/v2/accounts"), may carry a query string
    /// * `query` - Optional query string (without leading '?')
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<Envelope<T>, CoinbaseError> {
        self.request(Method::GET, path, query, None).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, CoinbaseError> {
        let body = serde_json::to_string(body).map_err(|e| CoinbaseError::Parse(e.to_string()))?;
        self.request(Method::POST, path, None, Some(body)).await
    }

    /// Make a PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Envelope<T>, CoinbaseError> {
        let body = serde_json::to_string(body).map_err(|e| CoinbaseError::Parse(e.to_string()))?;
        self.request(Method::PUT, path, None, Some(body)).await
    }

    /// Make a DELETE request expecting an envelope response.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, CoinbaseError> {
        self.request(Method::DELETE, path, None, None).await
    }

    /// Make a DELETE request expecting an empty response.
    pub async fn delete_empty(&self, path: &str) -> Result<(), CoinbaseError> {
        self.execute(&Method::DELETE, path, None, None).await?;
        Ok(())
    }

    // ========================================================================
    // Pagination
    // ========================================================================

    /// Fetch the page after `page`, if any.
    ///
    /// The `next_uri` cursor is an opaque complete path including its
    /// query string; it is replayed against the API base URL verbatim
    /// with the full auth pipeline applied. Returns `Ok(None)` when the
    /// collection is exhausted.
    pub async fn next_page<T: DeserializeOwned>(
        &self,
        page: &Envelope<T>,
    ) -> Result<Option<Envelope<T>>, CoinbaseError> {
        match page.next_uri() {
            Some(uri) => Ok(Some(self.get(uri, None).await?)),
            None => Ok(None),
        }
    }

    /// Fetch the page before `page`, if any.
    pub async fn prev_page<T: DeserializeOwned>(
        &self,
        page: &Envelope<T>,
    ) -> Result<Option<Envelope<T>>, CoinbaseError> {
        match page.previous_uri() {
            Some(uri) => Ok(Some(self.get(uri, None).await?)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Token lifecycle
    // ========================================================================

    /// Proactively refresh the OAuth token pair.
    ///
    /// Serialized with the automatic expired-token recovery, so at most
    /// one exchange is ever in flight per client.
    pub async fn refresh_tokens(&self) -> Result<OAuthTokenResponse, CoinbaseError> {
        self.refresh
            .force_refresh(&self.credential, &self.oauth, self.on_refresh.as_ref())
            .await
    }

    /// Revoke the current access token.
    pub async fn revoke_token(&self) -> Result<(), CoinbaseError> {
        let token = self
            .credential
            .bearer_token()
            .await
            .ok_or(CoinbaseError::Auth(auth::AuthError::NotRefreshable))?;

        self.oauth.revoke(&token, &token).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<String>,
    ) -> Result<Envelope<T>, CoinbaseError> {
        let raw = self.execute(&method, path, query, body.as_deref()).await?;
        Self::parse_envelope(raw)
    }

    /// Dispatch with expired-token recovery.
    ///
    /// On a 401 `expired_token` response under the OAuth scheme, runs
    /// the single-flight refresh and retries the original request once
    /// with fresh headers. A second expiry propagates; every other
    /// error passes through unmodified.
    async fn execute(
        &self,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: Option<&str>,
    ) -> Result<RawResponse, CoinbaseError> {
        let snapshot = self.credential.snapshot().await;
        let raw = self.dispatch(&snapshot, method, path, query, body).await?;
        if raw.is_success() {
            return Ok(raw);
        }

        match classify_error(raw.status, &raw.body) {
            CoinbaseError::ExpiredToken => {}
            other => return Err(other),
        }

        let Credential::OAuth(stale) = &snapshot else {
            // An API key cannot be refreshed; the expiry is terminal.
            return Err(CoinbaseError::ExpiredToken);
        };
        if !stale.can_refresh() {
            return Err(CoinbaseError::ExpiredToken);
        }

        self.refresh
            .refresh_if_stale(
                &self.credential,
                &self.oauth,
                stale.access_token(),
                self.on_refresh.as_ref(),
            )
            .await?;

        let fresh = self.credential.snapshot().await;
        let raw = self.dispatch(&fresh, method, path, query, body).await?;
        if raw.is_success() {
            Ok(raw)
        } else {
            Err(classify_error(raw.status, &raw.body))
        }
    }

    /// Build headers from a credential snapshot and hand off to the
    /// transport. The URL signed is exactly the URL dispatched.
    async fn dispatch(
        &self,
        credential: &Credential,
        method: &Method,
        path: &str,
        query: Option<&str>,
        body: Option<&str>,
    ) -> Result<RawResponse, CoinbaseError> {
        let url = self.rest.url_for(path, query);
        let headers = build_headers(credential, method, &url, body.unwrap_or(""));

        Ok(self
            .rest
            .send(method.clone(), path, query, body, &headers)
            .await?)
    }

    fn parse_envelope<T: DeserializeOwned>(raw: RawResponse) -> Result<Envelope<T>, CoinbaseError> {
        serde_json::from_str(&raw.body).map_err(|e| {
            tracing::warn!(body = %raw.body, error = %e, "failed to parse response envelope");
            CoinbaseError::Parse(e.to_string())
        })
    }
}
