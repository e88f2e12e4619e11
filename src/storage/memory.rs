//! In-memory user store for development and testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::UserStore;
use crate::auth::user::UserRecord;
use crate::error::{AthenaeumError, Result};

/// In-memory user storage
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<i64, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Creates a store holding the given users
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        let map = users.into_iter().map(|u| (u.id, u)).collect();
        Self {
            users: Arc::new(RwLock::new(map)),
        }
    }

    /// Loads users from a JSON array of user records
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AthenaeumError::ConfigError(format!("Cannot read users file {}: {}", path.display(), e))
        })?;
        let users: Vec<UserRecord> = serde_json::from_str(&raw).map_err(|e| {
            AthenaeumError::ConfigError(format!("Invalid users file {}: {}", path.display(), e))
        })?;
        log::info!("Loaded {} users from {}", users.len(), path.display());
        Ok(Self::with_users(users))
    }

    /// Insert or replace a user
    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.identifier == identifier)
            .cloned())
    }

    async fn set_refresh_token(&self, id: i64, token: Option<String>) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id) {
            Some(user) => {
                user.refresh_token = token;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
