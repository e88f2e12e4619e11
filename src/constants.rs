// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3030;

// Token lifetimes
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 3600;
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 7 * 24 * 3600;

// Revocation cache: disabled by default, never allowed to exceed the cap
pub const DEFAULT_SESSION_CACHE_SECS: u64 = 0;
pub const MAX_SESSION_CACHE_SECS: u64 = 30;
pub const SESSION_CACHE_CAPACITY: usize = 10_000;

// Login responses never complete faster than this
pub const DEFAULT_MIN_AUTH_MILLIS: u64 = 100;

pub const DEFAULT_COOKIE_NAME: &str = "token";

// Built-in fallbacks used when no secret is configured. Flagged at startup.
pub const INSECURE_DEFAULT_ACCESS_SECRET: &str = "INSECURE-DEFAULT-ACCESS-SECRET";
pub const INSECURE_DEFAULT_REFRESH_SECRET: &str = "INSECURE-DEFAULT-REFRESH-SECRET";

// User-visible failure messages
pub const MSG_LOGIN_FIRST: &str = "Please login first.";
pub const MSG_FAILED_TO_AUTHENTICATE: &str = "Failed to authenticate.";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid identifier or password.";

// Tokens longer than this are rejected before any decoding
pub const MAX_TOKEN_LENGTH: usize = 4096;
