//! Abstract storage interface for the user records the auth core touches
//!
//! The full user table belongs to the application's persistence layer.
//! Auth only needs lookups and a single writable column: the stored refresh token.

use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::user::UserRecord;
use crate::error::Result;

/// User record storage interface
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by primary key
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Look up a user by login identifier
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>>;

    /// Overwrite (or clear, with `None`) the stored refresh token.
    /// Returns `false` when no such user exists.
    async fn set_refresh_token(&self, id: i64, token: Option<String>) -> Result<bool>;

    /// Check storage backend health
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Shared reference to a user store
pub type SharedUserStore = Arc<dyn UserStore>;
