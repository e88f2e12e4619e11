//! Warp filters for the access guard and role gate
//!
//! Put path and method filters before these, so requests for other routes
//! never produce an auth rejection.

use std::convert::Infallible;
use warp::{Filter, Rejection};

use crate::auth::token::extract_token;
use crate::auth::{Authenticated, Role, RoleGate};
use crate::handlers::state::AuthState;
use crate::security_logger::{log_security_event, SecurityEvent};

/// Helper to include the auth state in a request
pub fn with_state(state: AuthState) -> impl Filter<Extract = (AuthState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Picks the access token from, in order: Authorization header,
/// X-Auth-Token header, session cookie
pub fn token_from_headers(
    authorization: Option<&str>,
    x_auth_token: Option<&str>,
    cookie: Option<&str>,
    cookie_name: &str,
) -> Option<String> {
    if let Some(token) = authorization.and_then(extract_token) {
        log::debug!("Token extracted from Authorization header");
        return Some(token);
    }

    if let Some(token) = x_auth_token.map(str::trim).filter(|t| !t.is_empty()) {
        log::debug!("Token extracted from X-Auth-Token header");
        return Some(token.to_string());
    }

    let prefix = format!("{}=", cookie_name);
    let token = cookie?
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix(prefix.as_str()))
        .filter(|t| !t.is_empty())?;
    log::debug!("Token extracted from session cookie");
    Some(token.to_string())
}

/// Extracts whatever access token the request presents, if any
pub fn presented_token(
    cookie_name: String,
) -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::header::optional::<String>("x-auth-token"))
        .and(warp::header::optional::<String>("cookie"))
        .map(
            move |authorization: Option<String>, x_auth: Option<String>, cookie: Option<String>| {
                token_from_headers(
                    authorization.as_deref(),
                    x_auth.as_deref(),
                    cookie.as_deref(),
                    &cookie_name,
                )
            },
        )
        .or_else(|_| async { Ok::<(Option<String>,), Infallible>((None,)) })
}

/// Access guard: rejects with `AuthRejection` or yields the authenticated identity
pub fn with_auth(state: AuthState) -> impl Filter<Extract = (Authenticated,), Error = Rejection> + Clone {
    presented_token(state.config.cookie_name.clone())
        .and(with_state(state))
        .and_then(|token: Option<String>, state: AuthState| async move {
            state
                .guard
                .authorize(token.as_deref())
                .await
                .map_err(warp::reject::custom)
        })
}

/// Access guard followed by a role gate
pub fn with_role(
    state: AuthState,
    role: Role,
) -> impl Filter<Extract = (Authenticated,), Error = Rejection> + Clone {
    let gate = RoleGate::require(role);
    with_auth(state).and_then(move |auth: Authenticated| async move {
        match gate.check(Some(&auth)) {
            Ok(()) => Ok(auth),
            Err(rejection) => {
                log_security_event(SecurityEvent::PermissionDenied {
                    user_id: auth.subject(),
                    required: gate.required(),
                    actual: auth.claims.role,
                })
                .await;
                Err(warp::reject::custom(rejection))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_takes_priority() {
        let token = token_from_headers(
            Some("Bearer from-header"),
            Some("from-x-auth"),
            Some("token=from-cookie"),
            "token",
        );
        assert_eq!(token.as_deref(), Some("from-header"));
    }

    #[test]
    fn test_x_auth_token_then_cookie() {
        assert_eq!(
            token_from_headers(None, Some("from-x-auth"), Some("token=from-cookie"), "token").as_deref(),
            Some("from-x-auth")
        );
        assert_eq!(
            token_from_headers(None, None, Some("theme=dark; token=from-cookie"), "token").as_deref(),
            Some("from-cookie")
        );
    }

    #[test]
    fn test_nothing_presented() {
        assert_eq!(token_from_headers(None, None, None, "token"), None);
        assert_eq!(token_from_headers(Some("Bearer "), Some(" "), Some("token="), "token"), None);
        assert_eq!(token_from_headers(None, None, Some("other=abc"), "token"), None);
    }
}
