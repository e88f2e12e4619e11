use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::auth::Identity;
use crate::client::api::AuthApi;
use crate::client::state::{reduce, SessionEvent, SessionPhase, SessionState};
use crate::client::storage::TokenStorage;
use crate::constants::MSG_FAILED_TO_AUTHENTICATE;
use crate::error::AthenaeumError;

/// Navigation targets the session store drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Authenticated landing area
    Landing,
    /// Public entry point (login)
    PublicEntry,
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// What a protected view should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewGate {
    /// A verify or login call is in flight
    Loading,
    Allow(Identity),
    Redirect(Route),
}

/// The one message shown for a failed call
fn failure_message(err: &AthenaeumError) -> String {
    match err {
        AthenaeumError::Unauthorized(msg) if !msg.is_empty() => msg.clone(),
        AthenaeumError::Unavailable(_) | AthenaeumError::StorageError(_) => {
            "Service temporarily unavailable.".to_string()
        }
        _ => MSG_FAILED_TO_AUTHENTICATE.to_string(),
    }
}

/// Client-held session state machine.
///
/// Bootstrap verification and login share one transition table. Each call
/// takes a fresh id when dispatched, and only the settlement of the most
/// recently dispatched call is applied.
pub struct SessionStore {
    state: RwLock<SessionState>,
    next_call: AtomicU64,
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl SessionStore {
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            next_call: AtomicU64::new(0),
            api,
            storage,
            navigator: None,
        }
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Current state snapshot
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.read().await.identity.clone()
    }

    /// Decides what a protected view renders
    pub async fn gate(&self) -> ViewGate {
        let state = self.state.read().await;
        match (&state.phase, &state.identity) {
            (SessionPhase::Verifying, _) => ViewGate::Loading,
            (SessionPhase::Authenticated, Some(identity)) => ViewGate::Allow(identity.clone()),
            _ => ViewGate::Redirect(Route::PublicEntry),
        }
    }

    fn navigate(&self, route: Route) {
        if let Some(navigator) = &self.navigator {
            navigator.navigate(route);
        }
    }

    async fn dispatch(&self) -> u64 {
        let call = self.next_call.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        if let Some(next) = reduce(&state, SessionEvent::Dispatched { call }) {
            *state = next;
        }
        call
    }

    /// Rehydrates the session from any persisted access token
    pub async fn bootstrap(&self) -> SessionState {
        let token = match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Could not read stored token: {}", e);
                None
            }
        };

        let call = self.dispatch().await;
        let result = self.api.verify(token).await;

        let mut state = self.state.write().await;
        match result {
            Ok(identity) => {
                if let Some(next) = reduce(&state, SessionEvent::Succeeded { call, identity }) {
                    *state = next;
                    self.navigate(Route::Landing);
                } else {
                    log::debug!("Discarding verify result of superseded call {}", call);
                }
            }
            Err(e) => {
                let message = failure_message(&e);
                if let Some(next) = reduce(&state, SessionEvent::Failed { call, message }) {
                    *state = next;
                    if let Err(e) = self.storage.clear() {
                        log::warn!("Could not clear stale token: {}", e);
                    }
                    self.navigate(Route::PublicEntry);
                } else {
                    log::debug!("Discarding verify failure of superseded call {}", call);
                }
            }
        }
        state.clone()
    }

    /// Logs in and persists the returned access token.
    ///
    /// A failed login leaves storage and any earlier session as they were.
    pub async fn login(&self, identifier: &str, secret: &str) -> SessionState {
        let call = self.dispatch().await;
        let result = self.api.login(identifier, secret).await;

        let mut state = self.state.write().await;
        if state.dispatched != call {
            log::debug!("Discarding login result of superseded call {}", call);
            // Idle means a logout came after this login; the session the
            // server just opened must not outlive it
            if let (Ok(outcome), SessionPhase::Idle) = (&result, state.phase) {
                self.revoke_on_server(Some(outcome.access_token.clone()));
            }
            return state.clone();
        }

        let event = match result {
            Ok(outcome) => match self.storage.store(&outcome.access_token) {
                Ok(()) => SessionEvent::Succeeded {
                    call,
                    identity: outcome.identity,
                },
                Err(e) => {
                    log::error!("Could not persist access token: {}", e);
                    SessionEvent::LoginRejected {
                        call,
                        message: failure_message(&e),
                    }
                }
            },
            Err(e) => SessionEvent::LoginRejected {
                call,
                message: failure_message(&e),
            },
        };

        let succeeded = matches!(event, SessionEvent::Succeeded { .. });
        if let Some(next) = reduce(&state, event) {
            *state = next;
            if succeeded {
                self.navigate(Route::Landing);
            }
        }
        state.clone()
    }

    /// Clears the local session at once and tells the server in the
    /// background. The returned handle resolves when the server call is done.
    pub async fn logout(&self) -> JoinHandle<()> {
        // Storage is only touched under the state lock, so a login settling
        // concurrently either lands before this or is discarded after it
        let token = {
            let mut state = self.state.write().await;
            let call = self.next_call.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(next) = reduce(&state, SessionEvent::LoggedOut { call }) {
                *state = next;
            }

            let token = self.storage.load().unwrap_or_else(|e| {
                log::warn!("Could not read stored token: {}", e);
                None
            });
            if let Err(e) = self.storage.clear() {
                log::warn!("Could not clear stored token: {}", e);
            }
            token
        };
        self.navigate(Route::PublicEntry);

        self.revoke_on_server(token)
    }

    fn revoke_on_server(&self, token: Option<String>) -> JoinHandle<()> {
        let api = self.api.clone();
        tokio::spawn(async move {
            let Some(token) = token else {
                log::debug!("No stored token, skipping server logout");
                return;
            };
            if let Err(e) = api.logout(token).await {
                log::warn!("Server logout failed: {}", e);
            }
        })
    }
}
