//! Request handlers for the auth endpoints

pub mod auth;
pub mod filters;
pub mod rejection;
pub mod state;

pub use filters::{presented_token, with_auth, with_role, with_state};
pub use rejection::handle_rejection;
pub use state::AuthState;

use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::security::api_security_headers;

async fn handle_health(state: AuthState) -> Result<impl Reply, Rejection> {
    let (status, label) = match state.store.health_check().await {
        Ok(true) => (StatusCode::OK, "ok"),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
        Err(e) => {
            log::error!("User store health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };
    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "status": label })),
        status,
    ))
}

/// GET /health: reports whether the user store is reachable
pub fn health_route(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .and_then(handle_health)
}

/// Complete route tree: auth endpoints, health check, rejection recovery
/// and security headers on every response
pub fn routes(state: AuthState) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    auth::auth_routes(state.clone())
        .or(health_route(state))
        .recover(handle_rejection)
        .with(warp::reply::with::headers(api_security_headers()))
}
