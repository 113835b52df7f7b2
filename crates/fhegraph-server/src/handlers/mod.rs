//! HTTP handler modules for the debugger API.
//!
//! Handlers are thin: they look the session up, acquire its lock, delegate to
//! the session's graph or coordinator, and return JSON.

pub mod selection;
pub mod sessions;
