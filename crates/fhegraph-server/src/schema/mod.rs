//! Request/response types for the debugger API.

pub mod selection;
pub mod sessions;
