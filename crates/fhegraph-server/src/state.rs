//! Application state shared by all handlers.
//!
//! [`AppState`] is cheap to clone: it only holds an `Arc` to the session
//! registry. Per-session serialization happens inside the registry.

use std::sync::Arc;

use crate::error::ApiError;
use crate::session::{DebugSession, SessionRegistry};

/// Shared application state for the HTTP server.
#[derive(Clone, Default)]
pub struct AppState {
    /// All debug sessions by name.
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    /// Creates state with no sessions.
    pub fn new() -> Self {
        AppState::default()
    }

    /// Creates state holding only the built-in `demo` session.
    pub fn with_demo() -> Result<Self, ApiError> {
        let state = AppState::new();
        state.sessions.register(DebugSession::demo())?;
        Ok(state)
    }
}
