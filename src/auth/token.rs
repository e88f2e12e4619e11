use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::auth::user::Role;
use crate::config::AuthConfig;
use crate::constants::MAX_TOKEN_LENGTH;
use crate::error::{AthenaeumError, Result};

/// The two token kinds, each signed with its own secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Why a token was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Malformed,
    SignatureInvalid,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::Malformed => write!(f, "token malformed"),
            TokenError::SignatureInvalid => write!(f, "token signature invalid"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT claims carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: i64,
    pub role: Role,
    /// Issued at (epoch seconds)
    pub iat: i64,
    /// Expiration (epoch seconds), fixed at signing time
    pub exp: i64,
    pub kind: TokenKind,
}

impl Claims {
    /// Creates claims issued now
    pub fn new(sub: i64, role: Role, kind: TokenKind, ttl: Duration) -> Self {
        Self::issued_at(sub, role, kind, chrono::Utc::now().timestamp(), ttl)
    }

    /// Creates claims with an explicit issue time
    pub fn issued_at(sub: i64, role: Role, kind: TokenKind, iat: i64, ttl: Duration) -> Self {
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub,
            role,
            iat,
            exp: iat.saturating_add(ttl),
            kind,
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs and verifies access and refresh tokens
pub struct TokenCodec {
    access: SigningKeys,
    refresh: SigningKeys,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec with one secret per token kind
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            access: SigningKeys::from_secret(access_secret),
            refresh: SigningKeys::from_secret(refresh_secret),
            validation,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.access_secret, &config.refresh_secret)
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Signs the claims with the secret of their kind
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.keys(claims.kind).encoding,
        )
        .map_err(|e| AthenaeumError::SystemError(format!("Failed to sign token: {}", e)))
    }

    /// Mints a token for a subject, issued now
    pub fn mint(&self, sub: i64, role: Role, kind: TokenKind, ttl: Duration) -> Result<String> {
        self.sign(&Claims::new(sub, role, kind, ttl))
    }

    /// Verifies signature and expiry and returns the embedded claims
    pub fn verify(&self, token: &str, kind: TokenKind) -> std::result::Result<Claims, TokenError> {
        if token.is_empty() || token.len() > MAX_TOKEN_LENGTH {
            return Err(TokenError::Malformed);
        }
        if token.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(TokenError::Malformed);
        }

        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;

        if data.claims.kind != kind {
            log::debug!("Token kind mismatch: expected {:?}, got {:?}", kind, data.claims.kind);
            return Err(TokenError::Malformed);
        }

        Ok(data.claims)
    }
}

/// Extracts the raw token from an Authorization header value.
/// Accepts both `Bearer <token>` and a bare token.
pub fn extract_token(auth_header: &str) -> Option<String> {
    let value = auth_header.trim();
    let has_scheme = value
        .get(..6)
        .map_or(false, |scheme| scheme.eq_ignore_ascii_case("bearer"))
        && value[6..].chars().next().map_or(true, char::is_whitespace);
    let token = if has_scheme { value[6..].trim() } else { value };
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
