use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

use crate::auth::token::TokenError;

#[derive(Debug)]
pub enum AthenaeumError {
    // Auth errors
    Unauthorized(String),
    Token(TokenError),

    // Persistence errors
    Unavailable(String),
    StorageError(String),

    // Validation errors
    BadRequest(String),

    // Configuration errors
    ConfigError(String),

    // System errors
    SystemError(String),
}

impl AthenaeumError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) | Self::StorageError(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ConfigError(_) | Self::SystemError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AthenaeumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::Token(err) => write!(f, "Token error: {}", err),
            Self::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
        }
    }
}

impl Error for AthenaeumError {}

impl warp::reject::Reject for AthenaeumError {}

impl From<TokenError> for AthenaeumError {
    fn from(err: TokenError) -> Self {
        AthenaeumError::Token(err)
    }
}

// Generic result type for Athenaeum
pub type Result<T> = std::result::Result<T, AthenaeumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AthenaeumError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AthenaeumError::Token(TokenError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AthenaeumError::Unavailable("db down".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AthenaeumError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
