//! HTTP/JSON debugger server for FHE program graphs.
//!
//! Hosts one [`session::DebugSession`] per program being inspected. Each
//! session pairs the program's source code and compiled graph with a
//! [`fhegraph_core::SelectionCoordinator`]; the browser-side code panel and
//! graph panel report clicks and selections through the selection routes and
//! redraw from the returned snapshot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod session;
pub mod state;
