use std::sync::Arc;

use crate::auth::{AccessGuard, SessionIssuer, TokenCodec};
use crate::config::AuthConfig;
use crate::error::Result;
use crate::storage::{SessionCache, SharedUserStore};

/// Everything the auth routes need, built once from the configuration
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub issuer: Arc<SessionIssuer>,
    pub guard: Arc<AccessGuard>,
    pub store: SharedUserStore,
}

impl AuthState {
    pub fn new(config: AuthConfig, store: SharedUserStore) -> Result<Self> {
        config.validate()?;

        let codec = Arc::new(TokenCodec::from_config(&config));
        let cache = Arc::new(SessionCache::new(config.session_cache_ttl));
        if cache.is_enabled() {
            log::info!(
                "Session lookups cached for up to {:?}; logouts on other nodes may take that long to apply",
                config.session_cache_ttl
            );
        }

        let issuer = SessionIssuer::new(&config, codec.clone(), store.clone(), cache.clone())?;
        let guard = AccessGuard::new(codec, store.clone(), cache);

        Ok(Self {
            config: Arc::new(config),
            issuer: Arc::new(issuer),
            guard: Arc::new(guard),
            store,
        })
    }
}
