//! Auth configuration
//! Everything the core needs is read once here and passed in explicitly.

use crate::constants::{
    DEFAULT_ACCESS_TTL_SECS, DEFAULT_COOKIE_NAME, DEFAULT_HOST, DEFAULT_MIN_AUTH_MILLIS,
    DEFAULT_PORT, DEFAULT_REFRESH_TTL_SECS, DEFAULT_SESSION_CACHE_SECS,
    INSECURE_DEFAULT_ACCESS_SECRET, INSECURE_DEFAULT_REFRESH_SECRET, MAX_SESSION_CACHE_SECS,
};
use crate::error::{AthenaeumError, Result};
use std::env;
use std::time::Duration;

/// Server and auth configuration parameters
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub host: String,
    pub port: u16,
    /// Secret for access token signing/validation
    pub access_secret: String,
    /// Secret for refresh token signing (separate from access for security)
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// How long a confirmed live session may be served from cache. Zero disables caching.
    pub session_cache_ttl: Duration,
    /// Name of the cookie carrying the access token
    pub cookie_name: String,
    /// Adds `Secure` to the session cookie
    pub cookie_secure: bool,
    /// Minimum duration of a login attempt
    pub min_auth_duration: Duration,
    /// Optional JSON file seeding the in-memory user store
    pub users_file: Option<String>,
}

impl AuthConfig {
    /// Deterministic configuration for tests
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            access_secret: "test-access-secret-only-for-tests-never-in-production".to_string(),
            refresh_secret: "test-refresh-secret-only-for-tests-never-in-production".to_string(),
            access_ttl: Duration::from_secs(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::from_secs(DEFAULT_REFRESH_TTL_SECS),
            session_cache_ttl: Duration::ZERO,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_secure: false,
            min_auth_duration: Duration::ZERO,
            users_file: None,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("ATHENAEUM_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("ATHENAEUM_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let access_secret = env::var("ATHENAEUM_ACCESS_SECRET")
            .or_else(|_| env::var("ACCESS_TOKEN_SECRET"))
            .unwrap_or_else(|_| INSECURE_DEFAULT_ACCESS_SECRET.to_string());

        let refresh_secret = env::var("ATHENAEUM_REFRESH_SECRET")
            .or_else(|_| env::var("REFRESH_TOKEN_SECRET"))
            .unwrap_or_else(|_| INSECURE_DEFAULT_REFRESH_SECRET.to_string());

        let access_ttl_secs = parse_u64("ATHENAEUM_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS);
        let refresh_ttl_secs = parse_u64("ATHENAEUM_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS);

        let cache_secs = parse_u64("ATHENAEUM_SESSION_CACHE_SECS", DEFAULT_SESSION_CACHE_SECS);
        if cache_secs > MAX_SESSION_CACHE_SECS {
            log::warn!(
                "ATHENAEUM_SESSION_CACHE_SECS={} exceeds the {}s cap; using the cap",
                cache_secs,
                MAX_SESSION_CACHE_SECS
            );
        }

        let cookie_name = env::var("ATHENAEUM_COOKIE_NAME").unwrap_or(DEFAULT_COOKIE_NAME.to_string());
        let cookie_secure = env::var("ATHENAEUM_COOKIE_SECURE")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let min_auth_millis = parse_u64("ATHENAEUM_MIN_AUTH_MILLIS", DEFAULT_MIN_AUTH_MILLIS);
        let users_file = env::var("ATHENAEUM_USERS_FILE").ok();

        let config = Self {
            host,
            port,
            access_secret,
            refresh_secret,
            access_ttl: Duration::from_secs(access_ttl_secs),
            refresh_ttl: Duration::from_secs(refresh_ttl_secs),
            session_cache_ttl: Duration::from_secs(cache_secs.min(MAX_SESSION_CACHE_SECS)),
            cookie_name,
            cookie_secure,
            min_auth_duration: Duration::from_millis(min_auth_millis),
            users_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that break the auth model outright
    pub fn validate(&self) -> Result<()> {
        if self.access_secret.is_empty() || self.refresh_secret.is_empty() {
            return Err(AthenaeumError::ConfigError(
                "Token secrets must not be empty".to_string(),
            ));
        }
        if self.access_secret == self.refresh_secret {
            return Err(AthenaeumError::ConfigError(
                "Access and refresh secrets must be different. A shared secret lets one token kind be forged from the other.".to_string(),
            ));
        }
        if self.access_ttl.is_zero() || self.refresh_ttl.is_zero() {
            return Err(AthenaeumError::ConfigError(
                "Token lifetimes must be greater than zero".to_string(),
            ));
        }
        if self.access_ttl > self.refresh_ttl {
            log::warn!("Access token lifetime exceeds refresh token lifetime");
        }
        Ok(())
    }

    /// Names of the secrets still running on built-in defaults
    pub fn insecure_defaults(&self) -> Vec<&'static str> {
        let mut found = Vec::new();
        if self.access_secret == INSECURE_DEFAULT_ACCESS_SECRET {
            found.push("ATHENAEUM_ACCESS_SECRET");
        }
        if self.refresh_secret == INSECURE_DEFAULT_REFRESH_SECRET {
            found.push("ATHENAEUM_REFRESH_SECRET");
        }
        found
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_u64(var: &str, default: u64) -> u64 {
    env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_testing_is_valid() {
        let config = AuthConfig::for_testing();
        assert!(config.validate().is_ok());
        assert!(config.insecure_defaults().is_empty());
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let mut config = AuthConfig::for_testing();
        config.refresh_secret = config.access_secret.clone();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AuthConfig::for_testing();
        config.access_ttl = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_insecure_defaults_are_reported() {
        let mut config = AuthConfig::for_testing();
        config.access_secret = INSECURE_DEFAULT_ACCESS_SECRET.to_string();
        config.refresh_secret = INSECURE_DEFAULT_REFRESH_SECRET.to_string();

        assert!(config.validate().is_ok());
        assert_eq!(
            config.insecure_defaults(),
            vec!["ATHENAEUM_ACCESS_SECRET", "ATHENAEUM_REFRESH_SECRET"]
        );
    }
}
