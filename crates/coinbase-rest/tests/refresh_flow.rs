//! Expired-token recovery against a local mock server.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use auth::{ApiKeyCredential, OAuthCredential};
use coinbase_rest::{CoinbaseClient, CoinbaseError, OAuthTokenResponse};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXPIRED_BODY: &str =
    r#"{"errors":[{"id":"expired_token","message":"The access token expired"}]}"#;

const FRESH_TOKEN_BODY: &str = r#"{
    "access_token": "fresh-token",
    "refresh_token": "refresh-2",
    "token_type": "bearer",
    "expires_in": 7200,
    "created_at": 1700000000
}"#;

fn refresh_capable_credential() -> OAuthCredential {
    OAuthCredential::with_refresh("stale-token", "refresh-1", "client-id", "client-secret")
        .unwrap()
}

fn client_for(server: &MockServer, credential: impl Into<auth::Credential>) -> CoinbaseClient {
    CoinbaseClient::with_urls(
        credential,
        &server.uri(),
        &format!("{}/oauth", server.uri()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_five_concurrent_expiries_refresh_exactly_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .and(header("Authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string(EXPIRED_BODY))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .and(header("Authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":{"id":"acct-1"}}"#))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRESH_TOKEN_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let hook_calls = Arc::new(AtomicU32::new(0));
    let hook_tokens: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let client = {
        let hook_calls = Arc::clone(&hook_calls);
        let hook_tokens = Arc::clone(&hook_tokens);
        Arc::new(client_for(&server, refresh_capable_credential()).on_refresh(Arc::new(
            move |tokens: &OAuthTokenResponse| {
                hook_calls.fetch_add(1, Ordering::SeqCst);
                hook_tokens.lock().unwrap().push(tokens.access_token.clone());
            },
        )))
    };

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(
                async move { client.get::<serde_json::Value>("/v2/accounts", None).await },
            )
        })
        .collect();

    for task in futures::future::join_all(tasks).await {
        let envelope = task.unwrap().unwrap();
        assert_eq!(envelope.data.unwrap()["id"], "acct-1");
    }

    // Exactly one exchange, observed by the hook before any retry ran.
    assert_eq!(hook_calls.load(Ordering::SeqCst), 1);
    assert_eq!(hook_tokens.lock().unwrap().as_slice(), ["fresh-token"]);

    // The shared credential holds the rotated pair.
    assert_eq!(
        client.credential().bearer_token().await.as_deref(),
        Some("fresh-token")
    );
    let refresh_token = client
        .credential()
        .with_oauth(|c| c.refresh_token().map(str::to_string))
        .await
        .unwrap();
    assert_eq!(refresh_token.as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_second_expiry_after_retry_is_a_hard_error() {
    let server = MockServer::start().await;

    // Every GET expires, including the retried one.
    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_string(EXPIRED_BODY))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRESH_TOKEN_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, refresh_capable_credential());

    let result = client.get::<serde_json::Value>("/v2/accounts", None).await;
    assert!(matches!(result, Err(CoinbaseError::ExpiredToken)));
}

#[tokio::test]
async fn test_refresh_failure_propagates_and_credential_is_untouched() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_string(EXPIRED_BODY))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"errors":[{"id":"invalid_grant","message":"Refresh token revoked"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, refresh_capable_credential());

    // The caller sees the refresh failure, not the original expiry.
    let result = client.get::<serde_json::Value>("/v2/accounts", None).await;
    match result {
        Err(CoinbaseError::Api { status, errors }) => {
            assert_eq!(status, 401);
            assert_eq!(errors[0].id, "invalid_grant");
        }
        other => panic!("unexpected: {other:?}"),
    }

    assert_eq!(
        client.credential().bearer_token().await.as_deref(),
        Some("stale-token")
    );
    let refresh_token = client
        .credential()
        .with_oauth(|c| c.refresh_token().map(str::to_string))
        .await
        .unwrap();
    assert_eq!(refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_invalid_scope_passes_through_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/buys"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"errors":[{"id":"invalid_scope","message":"Missing wallet:buys:create"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRESH_TOKEN_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, refresh_capable_credential());

    let result = client.get::<serde_json::Value>("/v2/buys", None).await;
    match result {
        Err(CoinbaseError::InvalidScope(message)) => {
            assert_eq!(message, "Missing wallet:buys:create");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn test_two_factor_required_passes_through_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/transactions"))
        .respond_with(ResponseTemplate::new(402).set_body_string(
            r#"{"errors":[{"id":"two_factor_required","message":"Re-send with CB-2FA-TOKEN"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRESH_TOKEN_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, refresh_capable_credential());

    let result = client
        .post::<serde_json::Value, _>("/v2/transactions", &serde_json::json!({"to": "x"}))
        .await;
    assert!(matches!(
        result,
        Err(CoinbaseError::TwoFactorRequired(_))
    ));
}

#[tokio::test]
async fn test_expired_token_under_api_key_scheme_is_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_string(EXPIRED_BODY))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRESH_TOKEN_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, ApiKeyCredential::new("key", "secret").unwrap());

    let result = client.get::<serde_json::Value>("/v2/accounts", None).await;
    assert!(matches!(result, Err(CoinbaseError::ExpiredToken)));
}

#[tokio::test]
async fn test_bearer_only_credential_cannot_recover() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_string(EXPIRED_BODY))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FRESH_TOKEN_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, OAuthCredential::new("stale-token").unwrap());

    let result = client.get::<serde_json::Value>("/v2/accounts", None).await;
    assert!(matches!(result, Err(CoinbaseError::ExpiredToken)));
}
