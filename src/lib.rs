//! Athenaeum - session authentication and authorization core
//!
//! This library provides signed access tokens backed by a server-tracked
//! refresh token for revocation, a role gate, warp filters and routes for
//! the auth endpoints, and a client-side session state machine.

pub mod auth;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod security;
pub mod security_logger;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use error::{AthenaeumError, Result};
