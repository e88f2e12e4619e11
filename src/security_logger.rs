//! Security-focused logging module to track authentication events
//!
//! Failures that clients see as one uniform 401 are recorded here with
//! their real cause.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::auth::user::Role;

/// Types of security events to track
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityEvent {
    // Authentication events
    AuthenticationSuccess { user_id: i64 },
    AuthenticationFailed { identifier: String, reason: String },
    LoggedOut { user_id: i64 },

    // Request-time events
    TokenValidationFailed { reason: String },
    SessionRevoked { user_id: i64 },
    PermissionDenied { user_id: i64, required: Role, actual: Role },

    // System security
    ProductionModeWarning { component: String, warning: String },
}

impl SecurityEvent {
    /// Key for counting and alerting
    fn key(&self) -> &'static str {
        match self {
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::LoggedOut { .. } => "logged_out",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::SessionRevoked { .. } => "session_revoked",
            SecurityEvent::PermissionDenied { .. } => "permission_denied",
            SecurityEvent::ProductionModeWarning { .. } => "production_warning",
        }
    }
}

/// Security event with timestamp
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    events: RwLock<Vec<TimestampedEvent>>,
    event_counts: RwLock<HashMap<&'static str, usize>>,
    max_events: usize,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl SecurityLogger {
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    pub fn with_capacity(max_events: usize) -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed", 5);
        alert_thresholds.insert("token_validation_failed", 10);
        alert_thresholds.insert("session_revoked", 10);
        alert_thresholds.insert("permission_denied", 20);

        Self {
            events: RwLock::new(Vec::new()),
            event_counts: RwLock::new(HashMap::new()),
            max_events,
            alert_thresholds,
        }
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let key = event.key();

        {
            let mut events = self.events.write().await;
            events.push(TimestampedEvent {
                event: event.clone(),
                timestamp: Instant::now(),
            });
            if events.len() > self.max_events {
                let excess = events.len() - self.max_events;
                events.drain(0..excess);
            }
        }

        {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(key) {
                if *count % threshold == 0 {
                    log::error!("SECURITY ALERT: {} events of type '{}' detected", count, key);
                }
            }
        }

        match &event {
            SecurityEvent::AuthenticationSuccess { user_id } => {
                log::info!("SECURITY: Login succeeded - User: {}", user_id);
            }
            SecurityEvent::AuthenticationFailed { identifier, reason } => {
                log::warn!("SECURITY: Login failed - Identifier: {}, Reason: {}", identifier, reason);
            }
            SecurityEvent::LoggedOut { user_id } => {
                log::info!("SECURITY: Session ended - User: {}", user_id);
            }
            SecurityEvent::TokenValidationFailed { reason } => {
                log::debug!("SECURITY: Token rejected - Reason: {}", reason);
            }
            SecurityEvent::SessionRevoked { user_id } => {
                log::warn!("SECURITY: Token presented for ended session - User: {}", user_id);
            }
            SecurityEvent::PermissionDenied { user_id, required, actual } => {
                log::warn!(
                    "SECURITY: Permission denied - User: {}, Required: {}, Actual: {}",
                    user_id, required, actual
                );
            }
            SecurityEvent::ProductionModeWarning { component, warning } => {
                log::warn!("SECURITY: Production mode warning - Component: {}, Warning: {}", component, warning);
            }
        }
    }

    /// Get recent security events
    pub async fn get_recent_events(&self, duration: Duration) -> Vec<SecurityEvent> {
        let events = self.events.read().await;
        events
            .iter()
            .filter(|e| e.timestamp.elapsed() <= duration)
            .map(|e| e.event.clone())
            .collect()
    }

    /// Get event statistics
    pub async fn get_event_stats(&self) -> HashMap<&'static str, usize> {
        self.event_counts.read().await.clone()
    }

    /// Clean up old events
    pub async fn cleanup_old_events(&self, max_age: Duration) {
        let mut events = self.events.write().await;
        events.retain(|e| e.timestamp.elapsed() <= max_age);
    }

    /// Start periodic cleanup task
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                self.cleanup_old_events(Duration::from_secs(3600 * 24)).await;
            }
        });
    }
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

static SECURITY_LOGGER: OnceLock<Arc<SecurityLogger>> = OnceLock::new();

/// Initialize the global security logger. Must be called inside a Tokio runtime.
pub fn init_security_logger() {
    SECURITY_LOGGER.get_or_init(|| {
        let logger = Arc::new(SecurityLogger::new());
        logger.clone().start_cleanup_task();
        logger
    });
}

/// Get the global security logger
pub fn get_security_logger() -> Option<Arc<SecurityLogger>> {
    SECURITY_LOGGER.get().cloned()
}

/// Log a security event using the global logger
pub async fn log_security_event(event: SecurityEvent) {
    match get_security_logger() {
        Some(logger) => logger.log_event(event).await,
        None => log::debug!("Security logger not initialized, dropping event: {:?}", event),
    }
}
