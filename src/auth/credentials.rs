//! Credential verification against stored Argon2 hashes

use rand::rngs::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;

use crate::auth::user::UserRecord;
use crate::error::{AthenaeumError, Result};
use crate::storage::SharedUserStore;

/// Why a credential check failed. Callers must report `NotFound` and
/// `BadSecret` identically; the distinction is for logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    NotFound,
    BadSecret,
    /// The user lookup itself failed
    Unavailable(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::NotFound => write!(f, "unknown identifier"),
            CredentialError::BadSecret => write!(f, "wrong password"),
            CredentialError::Unavailable(msg) => write!(f, "user lookup failed: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

// Argon2id, ~19 MiB memory, 2 passes
fn argon2() -> Result<Argon2<'static>> {
    let params = Params::new(19456, 2, 1, None)
        .map_err(|e| AthenaeumError::SystemError(format!("Invalid Argon2 parameters: {}", e)))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a secret into a PHC string
pub fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| AthenaeumError::SystemError(format!("Failed to hash secret: {}", e)))?;
    Ok(hash.to_string())
}

/// One-way comparison of a secret against a stored PHC string
pub fn verify_secret(phc: &str, secret: &str) -> bool {
    let parsed = match PasswordHash::new(phc) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Stored password hash is not a valid PHC string: {}", e);
            return false;
        }
    };
    // Parameters are read from the PHC string, so older hashes still verify
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

/// Checks identifier/secret pairs against the user store
pub struct CredentialVerifier {
    store: SharedUserStore,
    /// Verified against when the identifier is unknown, so both failure paths cost one hash
    dummy_hash: String,
}

impl CredentialVerifier {
    pub fn new(store: SharedUserStore) -> Result<Self> {
        Ok(Self {
            store,
            dummy_hash: hash_secret("athenaeum-dummy-secret")?,
        })
    }

    pub async fn verify(
        &self,
        identifier: &str,
        secret: &str,
    ) -> std::result::Result<UserRecord, CredentialError> {
        let user = self
            .store
            .find_by_identifier(identifier)
            .await
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;

        let phc = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let secret = secret.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_secret(&phc, &secret))
            .await
            .map_err(|e| CredentialError::Unavailable(format!("hash task failed: {}", e)))?;

        match user {
            None => Err(CredentialError::NotFound),
            Some(_) if !matches => Err(CredentialError::BadSecret),
            Some(user) => Ok(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::Role;
    use crate::storage::MemoryUserStore;
    use std::sync::Arc;

    #[test]
    fn test_hash_and_verify() {
        let phc = hash_secret("correct-pw").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(verify_secret(&phc, "correct-pw"));
        assert!(!verify_secret(&phc, "wrong-pw"));
    }

    #[test]
    fn test_plaintext_is_never_accepted() {
        assert!(!verify_secret("correct-pw", "correct-pw"));
    }

    #[tokio::test]
    async fn test_verifier_outcomes() {
        let user = UserRecord::new(
            1,
            "alice".into(),
            "Alice".into(),
            Role::User,
            hash_secret("correct-pw").unwrap(),
        );
        let store = Arc::new(MemoryUserStore::with_users(vec![user]));
        let verifier = CredentialVerifier::new(store).unwrap();

        assert_eq!(verifier.verify("alice", "correct-pw").await.unwrap().id, 1);
        assert_eq!(
            verifier.verify("alice", "nope").await.unwrap_err(),
            CredentialError::BadSecret
        );
        assert_eq!(
            verifier.verify("mallory", "correct-pw").await.unwrap_err(),
            CredentialError::NotFound
        );
    }
}
