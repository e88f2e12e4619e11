//! End-to-end tests of the auth routes through warp's test harness

use std::sync::Arc;

use athenaeum::auth::{hash_secret, Role, UserRecord};
use athenaeum::config::AuthConfig;
use athenaeum::handlers::{routes, AuthState};
use athenaeum::storage::MemoryUserStore;
use serde_json::Value;
use warp::http::StatusCode;

fn state() -> AuthState {
    let alice = UserRecord::new(
        1,
        "alice".to_string(),
        "Alice".to_string(),
        Role::User,
        hash_secret("correct-pw").unwrap(),
    )
    .with_avatar("avatars/alice.png".to_string());
    let store = Arc::new(MemoryUserStore::with_users(vec![alice]));
    AuthState::new(AuthConfig::for_testing(), store).unwrap()
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn test_login_admin_logout_scenario() {
    let filter = routes(state());

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({ "identifier": "alice", "secret": "correct-pw" }))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json(resp.body());
    assert_eq!(body["identity"]["id"], 1);
    assert_eq!(body["identity"]["role"], "user");
    assert_eq!(body["identity"]["name"], "Alice");
    assert_eq!(body["identity"]["avatar"], "avatars/alice.png");
    assert!(body["refreshToken"].is_string());
    let token = body["accessToken"].as_str().unwrap().to_string();

    let cookie = resp.headers()["set-cookie"].to_str().unwrap();
    assert!(cookie.starts_with(&format!("token={};", token)));
    assert!(cookie.contains("HttpOnly"));

    // Admin-only route with a user token
    let resp = warp::test::request()
        .path("/auth/admin")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = warp::test::request()
        .path("/auth/verify")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json(resp.body());
    assert_eq!(body["code"], 200);
    assert_eq!(body["data"]["id"], 1);

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/logout")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp.body())["status"], "ok");
    assert!(resp.headers()["set-cookie"].to_str().unwrap().contains("Max-Age=0"));

    let resp = warp::test::request()
        .path("/auth/verify")
        .header("authorization", format!("Bearer {}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(resp.body())["message"], "Failed to authenticate.");
}

#[tokio::test]
async fn test_verify_without_token() {
    let filter = routes(state());

    let resp = warp::test::request().path("/auth/verify").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = json(resp.body());
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "Please login first.");
}

#[tokio::test]
async fn test_invalid_token_message() {
    let filter = routes(state());

    let resp = warp::test::request()
        .path("/auth/verify")
        .header("authorization", "Bearer not.a.token")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(resp.body())["message"], "Failed to authenticate.");
}

#[tokio::test]
async fn test_bad_credentials_are_401() {
    let filter = routes(state());

    for (identifier, secret) in [("alice", "wrong-pw"), ("mallory", "correct-pw")] {
        let resp = warp::test::request()
            .method("POST")
            .path("/auth/login")
            .json(&serde_json::json!({ "identifier": identifier, "secret": secret }))
            .reply(&filter)
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json(resp.body())["message"], "Invalid identifier or password.");
    }
}

#[tokio::test]
async fn test_malformed_login_body_is_400() {
    let filter = routes(state());

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .header("content-type", "application/json")
        .body("{\"identifier\": ")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({ "identifier": "", "secret": "" }))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cookie_and_x_auth_token_transport() {
    let filter = routes(state());

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/login")
        .json(&serde_json::json!({ "username": "alice", "password": "correct-pw" }))
        .reply(&filter)
        .await;
    let token = json(resp.body())["accessToken"].as_str().unwrap().to_string();

    let resp = warp::test::request()
        .path("/auth/verify")
        .header("cookie", format!("theme=dark; token={}", token))
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = warp::test::request()
        .path("/auth/verify")
        .header("x-auth-token", token.as_str())
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // DELETE works for logout too
    let resp = warp::test::request()
        .method("DELETE")
        .path("/auth/logout")
        .header("x-auth-token", token.as_str())
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_logout_requires_token() {
    let filter = routes(state());

    let resp = warp::test::request()
        .method("POST")
        .path("/auth/logout")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json(resp.body())["message"], "Please login first.");
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let filter = routes(state());

    let resp = warp::test::request().path("/health").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json(resp.body())["status"], "ok");
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");

    let resp = warp::test::request().path("/nowhere").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
}
