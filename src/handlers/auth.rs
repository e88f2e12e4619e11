//! HTTP endpoints for login, logout and session verification

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::auth::{Authenticated, Identity, Role};
use crate::error::AthenaeumError;
use crate::handlers::filters::{with_auth, with_role, with_state};
use crate::handlers::state::AuthState;

const MAX_LOGIN_BODY_BYTES: u64 = 16 * 1024;

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    #[serde(alias = "password")]
    pub secret: String,
}

/// Successful response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub status: String,
}

/// `Set-Cookie` value carrying the access token
pub fn session_cookie(name: &str, token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn expired_cookie(name: &str, secure: bool) -> String {
    session_cookie(name, "", 0, secure)
}

async fn handle_login(request: LoginRequest, state: AuthState) -> Result<impl Reply, Rejection> {
    let identifier = request.identifier.trim();
    if identifier.is_empty() || request.secret.is_empty() {
        return Err(warp::reject::custom(AthenaeumError::BadRequest(
            "identifier and password are required".to_string(),
        )));
    }

    let outcome = state
        .issuer
        .login(identifier, &request.secret)
        .await
        .map_err(warp::reject::custom)?;

    let cookie = session_cookie(
        &state.config.cookie_name,
        &outcome.access_token,
        state.config.access_ttl.as_secs(),
        state.config.cookie_secure,
    );
    Ok(warp::reply::with_header(
        warp::reply::json(&outcome),
        "set-cookie",
        cookie,
    ))
}

async fn handle_logout(auth: Authenticated, state: AuthState) -> Result<impl Reply, Rejection> {
    state
        .issuer
        .logout(auth.subject())
        .await
        .map_err(warp::reject::custom)?;

    let body = LogoutResponse {
        status: "ok".to_string(),
    };
    Ok(warp::reply::with_header(
        warp::reply::json(&body),
        "set-cookie",
        expired_cookie(&state.config.cookie_name, state.config.cookie_secure),
    ))
}

fn identity_reply(auth: Authenticated) -> warp::reply::Json {
    let identity: Identity = auth.identity;
    warp::reply::json(&ApiResponse::ok(identity))
}

/// POST /auth/login
pub fn login_route(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_LOGIN_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state))
        .and_then(handle_login)
}

/// POST or DELETE /auth/logout
pub fn logout_route(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("auth" / "logout")
        .and(warp::post().or(warp::delete()).unify())
        .and(with_auth(state.clone()))
        .and(with_state(state))
        .and_then(handle_logout)
}

/// GET /auth/verify
pub fn verify_route(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("auth" / "verify")
        .and(warp::get())
        .and(with_auth(state))
        .map(identity_reply)
}

/// GET /auth/admin: verify, additionally requiring the admin role
pub fn admin_route(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path!("auth" / "admin")
        .and(warp::get())
        .and(with_role(state, Role::Admin))
        .map(identity_reply)
}

/// All auth endpoints
pub fn auth_routes(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    login_route(state.clone())
        .or(logout_route(state.clone()))
        .or(verify_route(state.clone()))
        .or(admin_route(state))
}
