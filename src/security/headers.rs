//! Security headers for auth API responses

use warp::http::header::{HeaderMap, HeaderName, HeaderValue};

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; connect-src 'self'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str =
    "geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()";

/// Strict security headers for API endpoints.
/// Auth responses carry tokens and must never be cached.
pub fn api_security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let entries: [(&'static str, &'static str); 6] = [
        ("x-frame-options", "DENY"),
        ("x-content-type-options", "nosniff"),
        ("referrer-policy", "no-referrer"),
        ("content-security-policy", STRICT_CSP),
        ("cache-control", "no-cache, no-store, must-revalidate"),
        ("permissions-policy", PERMISSIONS_POLICY),
    ];
    for (name, value) in entries {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}
