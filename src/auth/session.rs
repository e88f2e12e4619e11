//! Session issuing: login mints a token pair, logout ends the session
//!
//! A user has at most one live session. Its refresh token is written to the
//! user record before any token leaves this module, and clearing it is what
//! ends the session.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::credentials::{CredentialError, CredentialVerifier};
use crate::auth::token::{TokenCodec, TokenKind};
use crate::auth::user::Identity;
use crate::config::AuthConfig;
use crate::constants::MSG_INVALID_CREDENTIALS;
use crate::error::{AthenaeumError, Result};
use crate::security::AuthTimer;
use crate::security_logger::{log_security_event, SecurityEvent};
use crate::storage::{SessionCache, SharedUserStore};

/// Tokens and identity returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub identity: Identity,
}

pub struct SessionIssuer {
    codec: Arc<TokenCodec>,
    verifier: CredentialVerifier,
    store: SharedUserStore,
    cache: Arc<SessionCache>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    min_auth_duration: Duration,
}

impl SessionIssuer {
    pub fn new(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        store: SharedUserStore,
        cache: Arc<SessionCache>,
    ) -> Result<Self> {
        Ok(Self {
            codec,
            verifier: CredentialVerifier::new(store.clone())?,
            store,
            cache,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            min_auth_duration: config.min_auth_duration,
        })
    }

    /// Verifies credentials and starts a new session, replacing any previous one
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<LoginOutcome> {
        let timer = AuthTimer::new(self.min_auth_duration);
        let result = self.start_session(identifier, secret).await;
        timer.wait().await;
        result
    }

    async fn start_session(&self, identifier: &str, secret: &str) -> Result<LoginOutcome> {
        let user = match self.verifier.verify(identifier, secret).await {
            Ok(user) => user,
            Err(CredentialError::Unavailable(msg)) => {
                log::error!("Login unavailable: {}", msg);
                return Err(AthenaeumError::Unavailable(msg));
            }
            Err(reason) => {
                log_security_event(SecurityEvent::AuthenticationFailed {
                    identifier: identifier.to_string(),
                    reason: reason.to_string(),
                })
                .await;
                return Err(AthenaeumError::Unauthorized(MSG_INVALID_CREDENTIALS.to_string()));
            }
        };

        let access_token = self
            .codec
            .mint(user.id, user.role, TokenKind::Access, self.access_ttl)?;
        let refresh_token = self
            .codec
            .mint(user.id, user.role, TokenKind::Refresh, self.refresh_ttl)?;

        // Nothing is returned unless the refresh token is durably stored
        let stored = self
            .store
            .set_refresh_token(user.id, Some(refresh_token.clone()))
            .await
            .map_err(|e| {
                log::error!("Failed to persist session for user {}: {}", user.id, e);
                AthenaeumError::Unavailable(format!("Could not persist session: {}", e))
            })?;
        if !stored {
            log::warn!("User {} disappeared during login", user.id);
            return Err(AthenaeumError::Unauthorized(MSG_INVALID_CREDENTIALS.to_string()));
        }
        self.cache.evict(user.id).await;

        log_security_event(SecurityEvent::AuthenticationSuccess { user_id: user.id }).await;

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            identity: user.identity(),
        })
    }

    /// Ends the subject's session. Ending an already ended session is not an error.
    pub async fn logout(&self, subject: i64) -> Result<()> {
        let found = self
            .store
            .set_refresh_token(subject, None)
            .await
            .map_err(|e| {
                log::error!("Failed to clear session for user {}: {}", subject, e);
                AthenaeumError::Unavailable(format!("Could not clear session: {}", e))
            })?;
        self.cache.evict(subject).await;

        if found {
            log_security_event(SecurityEvent::LoggedOut { user_id: subject }).await;
        } else {
            log::debug!("Logout for unknown user {}", subject);
        }
        Ok(())
    }
}
