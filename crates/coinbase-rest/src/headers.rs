//! Request header construction for the two authentication schemes.
//!
//! Every outbound request carries the protocol version and user agent;
//! the active credential then contributes its scheme-specific headers.

use auth::{sign_request, Credential};
use rest_client::Method;

/// Protocol version header name.
pub const VERSION_HEADER: &str = "CB-VERSION";
/// Protocol version date sent with every request.
pub const API_VERSION: &str = "2024-01-01";
/// User agent header name.
pub const USER_AGENT_HEADER: &str = "User-Agent";
/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("coinbase-rest-rust/", env!("CARGO_PKG_VERSION"));
/// API key header name (API-key scheme).
pub const ACCESS_KEY_HEADER: &str = "CB-ACCESS-KEY";
/// Signature header name (API-key scheme).
pub const ACCESS_SIGN_HEADER: &str = "CB-ACCESS-SIGN";
/// Nonce header name (API-key scheme).
pub const ACCESS_TIMESTAMP_HEADER: &str = "CB-ACCESS-TIMESTAMP";
/// Bearer token header name (OAuth scheme).
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Build the full header set for one outbound request.
///
/// For the API-key scheme this draws the next nonce from the
/// credential's shared sequence and signs
/// `nonce + METHOD + absolute URL + body`; the url passed here must be
/// the absolute URL the transport will actually hit.
pub(crate) fn build_headers(
    credential: &Credential,
    method: &Method,
    url: &str,
    body: &str,
) -> Vec<(String, String)> {
    let mut headers = vec![
        (VERSION_HEADER.to_string(), API_VERSION.to_string()),
        (USER_AGENT_HEADER.to_string(), USER_AGENT.to_string()),
    ];

    match credential {
        Credential::ApiKey(credential) => {
            let nonce = credential.next_nonce().to_string();
            let signature = sign_request(
                &nonce,
                method.as_str(),
                url,
                body,
                credential.expose_secret(),
            );

            headers.push((ACCESS_KEY_HEADER.to_string(), credential.api_key().to_string()));
            headers.push((ACCESS_SIGN_HEADER.to_string(), signature));
            headers.push((ACCESS_TIMESTAMP_HEADER.to_string(), nonce));
        }
        Credential::OAuth(credential) => {
            headers.push((
                AUTHORIZATION_HEADER.to_string(),
                format!("Bearer {}", credential.access_token()),
            ));
        }
    }

    headers
}
