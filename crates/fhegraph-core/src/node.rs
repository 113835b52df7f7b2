//! Node wrapper for the program graph.

use serde::{Deserialize, Serialize};

use crate::ops::Operation;

/// One node of a compiled FHE program. Carries no identity of its own; see
/// [`NodeId`](crate::id::NodeId).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramNode {
    /// The operation this node performs.
    pub operation: Operation,
}

impl ProgramNode {
    pub fn new(operation: Operation) -> Self {
        ProgramNode { operation }
    }
}
