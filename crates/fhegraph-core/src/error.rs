//! Core error types for fhegraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants. Every variant is
//! a data defect in the program graph handed to the core; none of them are
//! transient, so callers surface them instead of retrying.

use crate::id::NodeId;
use thiserror::Error;

/// Core errors produced by the fhegraph-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The program graph is structurally unusable: an edge names a node index
    /// outside the node sequence, or the payload carries an operation or edge
    /// role outside the closed vocabulary.
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },

    /// A node index was not found in the graph.
    #[error("node not found: NodeId({id})", id = id.0)]
    NodeNotFound { id: NodeId },
}

impl CoreError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CoreError::InvalidGraph {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::invalid(err.to_string())
    }
}
