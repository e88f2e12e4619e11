//! Authentication and authorization module

pub mod credentials;
pub mod gate;
pub mod guard;
pub mod session;
pub mod token;
pub mod user;

// Re-export main components
pub use credentials::{hash_secret, verify_secret, CredentialError, CredentialVerifier};
pub use gate::RoleGate;
pub use guard::{AccessGuard, AuthRejection, Authenticated};
pub use session::{LoginOutcome, SessionIssuer};
pub use token::{Claims, TokenCodec, TokenError, TokenKind};
pub use user::{Identity, Role, UserRecord};
