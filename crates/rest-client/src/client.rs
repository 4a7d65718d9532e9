//! Generic REST transport wrapper around reqwest.

use crate::error::RestError;
use reqwest::{Client, Method, Response};
use std::time::Duration;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw HTTP response: status code plus body text.
///
/// The transport hands back both so the caller can classify
/// application-level errors from the body envelope.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

impl RawResponse {
    /// True for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Generic REST client for making HTTP requests.
///
/// Cancellation is cooperative: dropping the future returned by any
/// method aborts the outstanding network operation.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
}

impl RestClient {
    /// Create a new REST client with the given base URL.
    ///
    /// # Arguments
    /// * `base_url` - Base URL for all requests (e.g., "https://api.coinbase.com")
    /// * `timeout` - Request timeout duration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a new REST client with default timeout.
    pub fn with_default_timeout(base_url: &str) -> Result<Self, RestError> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the absolute URL for a path and optional query string.
    ///
    /// `path` may itself carry a query string (opaque pagination cursors
    /// do); it is appended to the base URL verbatim.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.base_url, path, q),
            _ => format!("{}{}", self.base_url, path),
        }
    }

    /// Dispatch a request and capture the raw response.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Request path (e.g., "/v2/accounts"), may include a query string
    /// * `query` - Optional query string (without leading '?')
    /// * `body` - Optional JSON body, sent verbatim with `Content-Type: application/json`
    /// * `headers` - Headers to attach
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&str>,
        headers: &[(String, String)],
    ) -> Result<RawResponse, RestError> {
        let url = self.url_for(path, query);
        tracing::debug!(method = %method, url = %url, "dispatching request");

        let mut request = self.client.request(method, &url);

        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        if let Some(b) = body {
            request = request
                .header("Content-Type", "application/json")
                .body(b.to_string());
        }

        let response = request.send().await?;
        Self::capture(response).await
    }

    /// POST a form-encoded body (used by the OAuth token endpoint).
    pub async fn post_form(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<RawResponse, RestError> {
        let url = self.url_for(path, None);
        tracing::debug!(url = %url, "dispatching form POST");

        let response = self.client.post(&url).form(params).send().await?;
        Self::capture(response).await
    }

    async fn capture(response: Response) -> Result<RawResponse, RestError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
