//! Session store and HTTP adapter against a live server

use std::net::SocketAddr;
use std::sync::Arc;

use athenaeum::auth::{hash_secret, Role, UserRecord};
use athenaeum::client::{
    AuthApi, HttpAuthApi, MemoryTokenStorage, SessionPhase, SessionStore, TokenStorage, ViewGate,
};
use athenaeum::config::AuthConfig;
use athenaeum::error::AthenaeumError;
use athenaeum::handlers::{routes, AuthState};
use athenaeum::storage::MemoryUserStore;

/// Serves the auth routes on an ephemeral local port
fn spawn_server() -> SocketAddr {
    let alice = UserRecord::new(
        1,
        "alice".to_string(),
        "Alice".to_string(),
        Role::User,
        hash_secret("correct-pw").unwrap(),
    );
    let store = Arc::new(MemoryUserStore::with_users(vec![alice]));
    let state = AuthState::new(AuthConfig::for_testing(), store).unwrap();

    let (addr, server) = warp::serve(routes(state)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn unauthorized_message(err: AthenaeumError) -> String {
    match err {
        AthenaeumError::Unauthorized(msg) => msg,
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

#[tokio::test]
async fn test_http_api_maps_server_responses() {
    let addr = spawn_server();
    let api = HttpAuthApi::new(format!("http://{}", addr));

    let outcome = api.login("alice", "correct-pw").await.unwrap();
    assert_eq!(outcome.identity.id, 1);
    assert_eq!(outcome.identity.role, Role::User);
    assert!(!outcome.access_token.is_empty());
    assert!(!outcome.refresh_token.is_empty());

    let identity = api.verify(Some(outcome.access_token.clone())).await.unwrap();
    assert_eq!(identity, outcome.identity);

    let err = api.verify(None).await.unwrap_err();
    assert_eq!(unauthorized_message(err), "Please login first.");

    let err = api.login("alice", "wrong-pw").await.unwrap_err();
    assert_eq!(unauthorized_message(err), "Invalid identifier or password.");

    api.logout(outcome.access_token.clone()).await.unwrap();
    let err = api.verify(Some(outcome.access_token)).await.unwrap_err();
    assert_eq!(unauthorized_message(err), "Failed to authenticate.");
}

#[tokio::test]
async fn test_http_api_reports_unreachable_server() {
    // Bind and drop a listener to get a port nothing listens on
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let api = HttpAuthApi::new(format!("http://{}", addr));

    let err = api.verify(Some("token".to_string())).await.unwrap_err();
    assert!(matches!(err, AthenaeumError::Unavailable(_)));
}

#[tokio::test]
async fn test_session_store_against_server() {
    let addr = spawn_server();
    let api = Arc::new(HttpAuthApi::new(format!("http://{}", addr)));
    let storage = Arc::new(MemoryTokenStorage::new());
    let store = SessionStore::new(api.clone(), storage.clone());

    let state = store.login("alice", "correct-pw").await;
    assert_eq!(state.phase, SessionPhase::Authenticated);
    assert_eq!(state.identity.as_ref().map(|i| i.id), Some(1));
    let token = storage.load().unwrap().unwrap();

    // A fresh client with the same stored token rehydrates the session
    let rehydrated = SessionStore::new(
        api.clone(),
        Arc::new(MemoryTokenStorage::with_token(token.clone())),
    );
    assert_eq!(rehydrated.bootstrap().await.phase, SessionPhase::Authenticated);

    store.logout().await.await.unwrap();
    assert_eq!(store.phase().await, SessionPhase::Idle);
    assert_eq!(storage.load().unwrap(), None);

    // The server dropped the session, so the old token no longer bootstraps
    storage.store(&token).unwrap();
    let state = store.bootstrap().await;
    assert_eq!(state.phase, SessionPhase::Failed);
    assert_eq!(state.last_error.as_deref(), Some("Failed to authenticate."));
    assert_eq!(storage.load().unwrap(), None);
    assert!(matches!(store.gate().await, ViewGate::Redirect(_)));
}
