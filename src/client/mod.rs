//! Client-side session handling: state machine, token persistence and the
//! HTTP adapter it talks to the server through

pub mod api;
pub mod state;
pub mod storage;
pub mod store;

pub use api::{AuthApi, HttpAuthApi};
pub use state::{reduce, SessionEvent, SessionPhase, SessionState};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};
pub use store::{Navigator, Route, SessionStore, ViewGate};
