//! Client session state and its transition table

use serde::{Deserialize, Serialize};

use crate::auth::Identity;

/// Where the client is in establishing a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Verifying,
    Authenticated,
    Failed,
}

/// Snapshot of the client-held session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub identity: Option<Identity>,
    pub last_error: Option<String>,
    /// Id of the most recently dispatched call; only its settlement applies
    pub dispatched: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            identity: None,
            last_error: None,
            dispatched: 0,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated && self.identity.is_some()
    }
}

/// Inputs to the reducer. Every event carries the id of the call it belongs to.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A verify or login call was sent
    Dispatched { call: u64 },
    /// The server confirmed the identity
    Succeeded { call: u64, identity: Identity },
    /// A verify call was rejected; the stored session is stale
    Failed { call: u64, message: String },
    /// A login attempt was rejected; whatever session existed before stands
    LoginRejected { call: u64, message: String },
    /// Local logout
    LoggedOut { call: u64 },
}

impl SessionEvent {
    pub fn call(&self) -> u64 {
        match self {
            Self::Dispatched { call }
            | Self::Succeeded { call, .. }
            | Self::Failed { call, .. }
            | Self::LoginRejected { call, .. }
            | Self::LoggedOut { call } => *call,
        }
    }
}

/// Applies `event` to `state`.
///
/// Returns `None` when the event is stale: a dispatch or logout older than
/// the latest one, or a settlement for any call other than the latest
/// dispatched one. Stale events leave the state untouched.
///
/// A dispatch keeps the current identity so that a rejected login can fall
/// back to it; only `Succeeded` replaces it and only `Failed` or `LoggedOut`
/// clear it.
pub fn reduce(state: &SessionState, event: SessionEvent) -> Option<SessionState> {
    match event {
        SessionEvent::Dispatched { call } if call > state.dispatched => Some(SessionState {
            phase: SessionPhase::Verifying,
            identity: state.identity.clone(),
            last_error: None,
            dispatched: call,
        }),
        SessionEvent::LoggedOut { call } if call > state.dispatched => Some(SessionState {
            phase: SessionPhase::Idle,
            identity: None,
            last_error: None,
            dispatched: call,
        }),
        SessionEvent::Succeeded { call, identity }
            if call == state.dispatched && state.phase == SessionPhase::Verifying =>
        {
            Some(SessionState {
                phase: SessionPhase::Authenticated,
                identity: Some(identity),
                last_error: None,
                dispatched: call,
            })
        }
        SessionEvent::Failed { call, message }
            if call == state.dispatched && state.phase == SessionPhase::Verifying =>
        {
            Some(SessionState {
                phase: SessionPhase::Failed,
                identity: None,
                last_error: Some(message),
                dispatched: call,
            })
        }
        SessionEvent::LoginRejected { call, message }
            if call == state.dispatched && state.phase == SessionPhase::Verifying =>
        {
            let phase = if state.identity.is_some() {
                SessionPhase::Authenticated
            } else {
                SessionPhase::Failed
            };
            Some(SessionState {
                phase,
                identity: state.identity.clone(),
                last_error: Some(message),
                dispatched: call,
            })
        }
        _ => None,
    }
}
