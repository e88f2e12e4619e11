//! Access guard: per-request authentication
//!
//! A request is let through only if its access token verifies AND the
//! subject still has a stored refresh token. The second check is what makes
//! logout effective before the access token expires.

use std::sync::Arc;
use warp::http::StatusCode;

use crate::auth::token::{Claims, TokenCodec, TokenError, TokenKind};
use crate::auth::user::Identity;
use crate::constants::{MSG_FAILED_TO_AUTHENTICATE, MSG_LOGIN_FIRST};
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::{SessionCache, SharedUserStore};

/// Reasons a protected request is turned away. All of them are reported as 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken(TokenError),
    SessionRevoked,
    LookupFailed,
    RoleMismatch,
    /// A role check ran without an authenticated identity
    MissingIdentity,
}

impl AuthRejection {
    /// The only text clients ever see
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingToken => MSG_LOGIN_FIRST,
            _ => MSG_FAILED_TO_AUTHENTICATE,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl warp::reject::Reject for AuthRejection {}

/// Identity attached to a request that passed the guard
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub claims: Claims,
    pub identity: Identity,
}

impl Authenticated {
    pub fn subject(&self) -> i64 {
        self.claims.sub
    }
}

pub struct AccessGuard {
    codec: Arc<TokenCodec>,
    store: SharedUserStore,
    cache: Arc<SessionCache>,
}

impl AccessGuard {
    pub fn new(codec: Arc<TokenCodec>, store: SharedUserStore, cache: Arc<SessionCache>) -> Self {
        Self { codec, store, cache }
    }

    /// Runs the full check for one request
    pub async fn authorize(&self, token: Option<&str>) -> Result<Authenticated, AuthRejection> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(AuthRejection::MissingToken)?;

        let claims = match self.codec.verify(token, TokenKind::Access) {
            Ok(claims) => claims,
            Err(e) => {
                log_security_event(SecurityEvent::TokenValidationFailed {
                    reason: e.to_string(),
                })
                .await;
                return Err(AuthRejection::InvalidToken(e));
            }
        };

        let identity = self.live_identity(claims.sub).await?;
        Ok(Authenticated { claims, identity })
    }

    async fn live_identity(&self, subject: i64) -> Result<Identity, AuthRejection> {
        if let Some(identity) = self.cache.get(subject).await {
            return Ok(identity);
        }

        let user = self.store.find_by_id(subject).await.map_err(|e| {
            log::error!("Session lookup failed for user {}: {}", subject, e);
            AuthRejection::LookupFailed
        })?;

        match user {
            Some(user) if user.has_live_session() => {
                let identity = user.identity();
                self.cache.confirm(identity.clone()).await;
                Ok(identity)
            }
            _ => {
                log_security_event(SecurityEvent::SessionRevoked { user_id: subject }).await;
                Err(AuthRejection::SessionRevoked)
            }
        }
    }
}
