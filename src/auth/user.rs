use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AthenaeumError;

/// Application-wide roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AthenaeumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(AthenaeumError::BadRequest(format!("Unknown role: {}", other))),
        }
    }
}

/// The slice of the persisted user row the auth core reads and writes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key
    pub id: i64,
    /// Login identifier (username or email)
    pub identifier: String,
    /// Display name
    pub name: String,
    pub role: Role,
    /// Avatar reference (URL or upload key)
    #[serde(default)]
    pub avatar: Option<String>,
    /// Argon2 PHC string
    pub password_hash: String,
    /// Present while the user has a live session
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl UserRecord {
    /// Creates a user without a session
    pub fn new(id: i64, identifier: String, name: String, role: Role, password_hash: String) -> Self {
        Self {
            id,
            identifier,
            name,
            role,
            avatar: None,
            password_hash,
            refresh_token: None,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn with_avatar(mut self, avatar: String) -> Self {
        self.avatar = Some(avatar);
        self
    }

    /// A stored, non-empty refresh token is the only evidence of a live session
    pub fn has_live_session(&self) -> bool {
        self.refresh_token.as_deref().map_or(false, |t| !t.is_empty())
    }

    /// The minimal payload handed back to clients
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
        }
    }
}

/// Identity payload returned by login and verify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub avatar: Option<String>,
}
