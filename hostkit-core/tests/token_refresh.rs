//! Integration tests for token refresh over HTTP.
//!
//! These tests verify that the DefaultTokenManager, driving an
//! HttpTokenEndpoint:
//! - Sends the right grant as a form-encoded body
//! - Adopts new access values and rotated refresh tokens
//! - Surfaces token endpoint failures with their status and body
//! - Never contacts the endpoint for static tokens

#![cfg(feature = "oauth")]

use hostkit_core::{
    Credentials, DefaultTokenManager, GrantRequest, HttpTokenEndpoint, Secret, TokenEndpoint,
    TokenError, TokenManager,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

fn token_body(access: &str, refresh: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 3600,
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = serde_json::json!(refresh);
    }
    body
}

fn setup_manager(server: &MockServer, credentials: Credentials) -> DefaultTokenManager<HttpTokenEndpoint> {
    let endpoint = HttpTokenEndpoint::new(&server.uri()).unwrap();
    DefaultTokenManager::new(&credentials, endpoint)
}

#[tokio::test]
async fn test_refresh_token_grant_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("client_id=test-client"))
        .and(body_string_contains("client_secret=test-secret"))
        .and(body_string_contains("refresh_token=old-refresh"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(token_body("new-access", Some("new-refresh"))),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = setup_manager(
        &mock_server,
        Credentials::new()
            .with_client_id("test-client")
            .with_client_secret("test-secret")
            .with_refresh_token("old-refresh"),
    );

    let token = manager.authorization_value().await.unwrap();
    assert_eq!(token.expose(), "new-access");

    let state = manager.store().snapshot();
    assert_eq!(state.refresh.unwrap().expose(), "new-refresh");
}

#[tokio::test]
async fn test_client_credentials_grant_form_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=test-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("cc-access", None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = setup_manager(
        &mock_server,
        Credentials::new()
            .with_client_id("test-client")
            .with_client_secret("test-secret"),
    );

    let token = manager.authorization_value().await.unwrap();
    assert_eq!(token.expose(), "cc-access");
    assert!(manager.store().snapshot().refresh.is_none());
}

#[tokio::test]
async fn test_refresh_failure_embeds_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .mount(&mock_server)
        .await;

    let manager = setup_manager(
        &mock_server,
        Credentials::new()
            .with_client_id("test-client")
            .with_client_secret("test-secret")
            .with_refresh_token("revoked-refresh"),
    );

    let result = manager.authorization_value().await;

    match result {
        Err(e @ TokenError::Endpoint { .. }) => {
            assert_eq!(e.status(), Some(400));
            let message = e.to_string();
            assert!(message.contains("400"));
            assert!(message.contains("invalid_grant"));
        }
        other => panic!("Expected TokenError::Endpoint, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let endpoint = HttpTokenEndpoint::new(&mock_server.uri()).unwrap();
    let grant = GrantRequest::ClientCredentials {
        client_id: "test-client".to_string(),
        client_secret: Secret::new("test-secret"),
    };

    let result = endpoint.exchange(&grant).await;
    assert!(matches!(result, Err(TokenError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_missing_expires_in_is_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "access_token": "at" })),
        )
        .mount(&mock_server)
        .await;

    let endpoint = HttpTokenEndpoint::new(&mock_server.uri()).unwrap();
    let grant = GrantRequest::ClientCredentials {
        client_id: "test-client".to_string(),
        client_secret: Secret::new("test-secret"),
    };

    let result = endpoint.exchange(&grant).await;
    assert!(matches!(result, Err(TokenError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_huge_expires_in_is_invalid() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "at",
            "expires_in": i64::MAX,
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = setup_manager(
        &mock_server,
        Credentials::new()
            .with_client_id("test-client")
            .with_client_secret("test-secret"),
    );

    let result = manager.authorization_value().await;
    assert!(matches!(result, Err(TokenError::InvalidResponse { .. })));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Nothing listens on port 1.
    let endpoint = HttpTokenEndpoint::new("http://127.0.0.1:1").unwrap();
    let grant = GrantRequest::ClientCredentials {
        client_id: "test-client".to_string(),
        client_secret: Secret::new("test-secret"),
    };

    let result = endpoint.exchange(&grant).await;
    assert!(matches!(result, Err(TokenError::Network { .. })));
}

#[tokio::test]
async fn test_static_token_never_contacts_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("unused", None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let manager = setup_manager(&mock_server, Credentials::new().with_access_token("pat-123"));

    for _ in 0..3 {
        assert_eq!(manager.authorization_value().await.unwrap().expose(), "pat-123");
    }
}

#[tokio::test]
async fn test_concurrent_refresh_single_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("shared-access", None))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let manager = setup_manager(
        &mock_server,
        Credentials::new()
            .with_client_id("test-client")
            .with_client_secret("test-secret"),
    );

    let (a, b, c) = tokio::join!(
        manager.authorization_value(),
        manager.authorization_value(),
        manager.authorization_value()
    );

    assert_eq!(a.unwrap().expose(), "shared-access");
    assert_eq!(b.unwrap().expose(), "shared-access");
    assert_eq!(c.unwrap().expose(), "shared-access");
}
