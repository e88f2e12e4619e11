//! Behaviour when the user store cannot be written or reached

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use warp::http::StatusCode;

use athenaeum::auth::{hash_secret, Role, SessionIssuer, TokenCodec, TokenKind, UserRecord};
use athenaeum::config::AuthConfig;
use athenaeum::error::{AthenaeumError, Result};
use athenaeum::handlers::{routes, AuthState};
use athenaeum::storage::{MemoryUserStore, SessionCache, UserStore};

/// Reads from memory, refuses every write and reports itself unhealthy
struct ReadOnlyStore {
    inner: MemoryUserStore,
}

#[async_trait]
impl UserStore for ReadOnlyStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>> {
        self.inner.find_by_identifier(identifier).await
    }

    async fn set_refresh_token(&self, _id: i64, _token: Option<String>) -> Result<bool> {
        Err(AthenaeumError::StorageError("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<bool> {
        Err(AthenaeumError::StorageError("connection refused".to_string()))
    }
}

/// alice already has a live session, so the guard lets her tokens through
fn read_only_store() -> Arc<ReadOnlyStore> {
    let mut alice = UserRecord::new(
        1,
        "alice".to_string(),
        "Alice".to_string(),
        Role::User,
        hash_secret("correct-pw").unwrap(),
    );
    alice.refresh_token = Some("existing-refresh".to_string());
    Arc::new(ReadOnlyStore {
        inner: MemoryUserStore::with_users(vec![alice]),
    })
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_login_fails_unavailable_when_session_cannot_be_stored() {
    let config = AuthConfig::for_testing();
    let issuer = SessionIssuer::new(
        &config,
        Arc::new(TokenCodec::from_config(&config)),
        read_only_store(),
        Arc::new(SessionCache::disabled()),
    )
    .unwrap();

    let err = issuer.login("alice", "correct-pw").await.unwrap_err();
    assert!(matches!(err, AthenaeumError::Unavailable(_)));
    assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let err = issuer.logout(1).await.unwrap_err();
    assert!(matches!(err, AthenaeumError::Unavailable(_)));
}

#[tokio::test]
async fn test_http_login_returns_503_without_tokens() {
    let state = AuthState::new(AuthConfig::for_testing(), read_only_store()).unwrap();
    let filter = routes(state);

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({ "identifier": "alice", "secret": "correct-pw" }))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(resp.headers().get("set-cookie").is_none());

    let body = json(resp.body());
    assert_eq!(body["code"], 503);
    assert_eq!(body["message"], "Service temporarily unavailable.");
    assert!(body.get("accessToken").is_none());
    assert!(body.get("refreshToken").is_none());
}

#[tokio::test]
async fn test_http_logout_returns_503() {
    let config = AuthConfig::for_testing();
    let token = TokenCodec::from_config(&config)
        .mint(1, Role::User, TokenKind::Access, Duration::from_secs(60))
        .unwrap();
    let filter = routes(AuthState::new(config, read_only_store()).unwrap());

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(resp.body())["message"], "Service temporarily unavailable.");
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let filter = routes(AuthState::new(AuthConfig::for_testing(), read_only_store()).unwrap());

    let resp = warp::test::request().path("/health").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(resp.body())["status"], "unavailable");
}
