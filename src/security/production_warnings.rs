//! Startup warnings for insecure configurations
//!
//! Built-in default secrets keep the server bootable out of the box. They are
//! reported here on every start, and escalated when running in production.

use crate::config::AuthConfig;
use crate::security_logger::{log_security_event, SecurityEvent};

/// Production warning types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductionWarning {
    /// A signing secret falls back to its built-in default
    InsecureDefaults { variable: String },
    /// A configured secret is short or contains an obvious pattern
    WeakSecret { variable: String },
    /// Session cookie is sent over plain HTTP
    InsecureCookie,
    /// Debug logging enabled in production
    DebugLoggingEnabled,
}

impl ProductionWarning {
    fn describe(&self) -> (String, String) {
        match self {
            ProductionWarning::InsecureDefaults { variable } => (
                "auth".to_string(),
                format!("{} is not set; using the built-in insecure default", variable),
            ),
            ProductionWarning::WeakSecret { variable } => (
                "auth".to_string(),
                format!("{} looks weak (short or predictable)", variable),
            ),
            ProductionWarning::InsecureCookie => (
                "cookie".to_string(),
                "Session cookie is not marked Secure".to_string(),
            ),
            ProductionWarning::DebugLoggingEnabled => (
                "logging".to_string(),
                "Debug logging is enabled".to_string(),
            ),
        }
    }
}

/// Production environment detector
pub struct ProductionChecker {
    is_production: bool,
    environment: String,
}

impl ProductionChecker {
    pub fn new() -> Self {
        let environment = std::env::var("RUST_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());
        Self::for_environment(environment)
    }

    pub fn for_environment(environment: String) -> Self {
        let is_production = matches!(
            environment.to_lowercase().as_str(),
            "production" | "prod" | "release"
        );
        Self {
            is_production,
            environment,
        }
    }

    pub fn is_production(&self) -> bool {
        self.is_production
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Collect warnings for the given configuration
    pub fn check_config(&self, config: &AuthConfig) -> Vec<ProductionWarning> {
        let mut warnings: Vec<ProductionWarning> = config
            .insecure_defaults()
            .into_iter()
            .map(|variable| ProductionWarning::InsecureDefaults {
                variable: variable.to_string(),
            })
            .collect();

        for (variable, secret) in [
            ("ATHENAEUM_ACCESS_SECRET", &config.access_secret),
            ("ATHENAEUM_REFRESH_SECRET", &config.refresh_secret),
        ] {
            let already_flagged = warnings.iter().any(|w| {
                matches!(w, ProductionWarning::InsecureDefaults { variable: v } if v == variable)
            });
            if !already_flagged && is_weak_secret(secret) {
                warnings.push(ProductionWarning::WeakSecret {
                    variable: variable.to_string(),
                });
            }
        }

        if self.is_production {
            if !config.cookie_secure {
                warnings.push(ProductionWarning::InsecureCookie);
            }
            let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
            if rust_log.contains("debug") || rust_log.contains("trace") {
                warnings.push(ProductionWarning::DebugLoggingEnabled);
            }
        }

        warnings
    }

    /// Log every warning; errors in production, warnings elsewhere
    pub async fn report(&self, warnings: &[ProductionWarning]) {
        for warning in warnings {
            let (component, message) = warning.describe();
            if self.is_production {
                log::error!("PRODUCTION WARNING: {} - {}", component, message);
            } else {
                log::warn!("CONFIG WARNING: {} - {}", component, message);
            }
            log_security_event(SecurityEvent::ProductionModeWarning {
                component,
                warning: message,
            })
            .await;
        }
    }
}

impl Default for ProductionChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a secret is too weak for production use
fn is_weak_secret(secret: &str) -> bool {
    const INSECURE_PATTERNS: [&str; 8] = [
        "changeme",
        "password",
        "example",
        "default",
        "your-secret",
        "insecure",
        "12345",
        "test",
    ];

    if secret.len() < 32 {
        return true;
    }

    let lower = secret.to_lowercase();
    if INSECURE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    let mut chars = secret.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}

/// Check the configuration and log the outcome
pub async fn init_production_warnings(config: &AuthConfig) -> Vec<ProductionWarning> {
    let checker = ProductionChecker::new();
    let warnings = checker.check_config(config);

    if warnings.is_empty() {
        log::info!("Security configuration check passed ({})", checker.environment());
    } else {
        checker.report(&warnings).await;
    }
    warnings
}
