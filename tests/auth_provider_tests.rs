//! Tests for the HTTP auth provider against a mocked provider API.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crm::error::AuthError;
use crm::session::{AuthProvider, HttpAuthProvider};

const USER_ID: &str = "7d7e9c5a-40ce-49a8-9a71-8f9f2c9b8e11";

fn token_body() -> serde_json::Value {
    json!({
        "access_token": "jwt-token",
        "token_type": "bearer",
        "user": {"id": USER_ID, "email": "ada@example.com"}
    })
}

#[tokio::test]
async fn test_sign_in_success_sends_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", "publishable-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), Some("publishable-key".to_string()));
    let identity = provider.sign_in("ada@example.com", "secret1").await.unwrap();

    assert_eq!(identity.user_id.to_string(), USER_ID);
    assert_eq!(identity.email, "ada@example.com");
}

#[tokio::test]
async fn test_rejected_credentials_surface_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error_description": "Invalid login credentials"})),
        )
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None);
    let err = provider.sign_in("ada@example.com", "wrong").await;

    match err {
        Err(AuthError::Rejected(message)) => {
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_response_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None);
    let err = provider.sign_in("ada@example.com", "secret1").await;
    assert!(matches!(err, Err(AuthError::Malformed(_))));
}

#[tokio::test]
async fn test_server_error_maps_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None);
    let err = provider.sign_in("ada@example.com", "secret1").await;
    assert!(matches!(err, Err(AuthError::Transport(_))));
}

#[tokio::test]
async fn test_sign_up_without_session_returns_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            // Email confirmation enabled: no access token yet.
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": USER_ID, "email": "new@example.com"})),
        )
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None);
    let identity = provider
        .sign_up("new@example.com", "secret1", Some("New User"))
        .await
        .unwrap();
    assert_eq!(identity.email, "new@example.com");
}

#[tokio::test]
async fn test_current_session_without_token_is_none() {
    let provider = HttpAuthProvider::new("http://localhost:1", None);
    let session = provider.current_session().await.unwrap();
    assert!(session.is_none());
}

#[tokio::test]
async fn test_sign_out_uses_stored_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None);
    provider.sign_in("ada@example.com", "secret1").await.unwrap();
    provider.sign_out().await.unwrap();

    // Token is forgotten, so the session lookup short-circuits to none.
    assert!(provider.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn test_current_session_with_valid_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer jwt-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": USER_ID, "email": "ada@example.com"})),
        )
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None);
    provider.sign_in("ada@example.com", "secret1").await.unwrap();

    let session = provider.current_session().await.unwrap().unwrap();
    assert_eq!(session.email, "ada@example.com");
}
