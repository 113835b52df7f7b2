//! Operand edges of the program graph.
//!
//! An [`Edge`] says that the value produced by `source` feeds the `role`
//! operand position of `target`. On the wire an edge is the triple
//! `[source, target, role]`.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Operand position a source node feeds into its target.
///
/// Ordered `Left < Right < Unary` so operand lists sort into argument order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeRole {
    /// Left operand of a binary operation.
    Left,
    /// Right operand of a binary operation.
    Right,
    /// Sole operand of a unary operation.
    Unary,
}

/// A directed operand edge `source -> target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(NodeId, NodeId, EdgeRole)", into = "(NodeId, NodeId, EdgeRole)")]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub role: EdgeRole,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId, role: EdgeRole) -> Self {
        Edge {
            source,
            target,
            role,
        }
    }
}

impl From<(NodeId, NodeId, EdgeRole)> for Edge {
    fn from((source, target, role): (NodeId, NodeId, EdgeRole)) -> Self {
        Edge::new(source, target, role)
    }
}

impl From<Edge> for (NodeId, NodeId, EdgeRole) {
    fn from(edge: Edge) -> Self {
        (edge.source, edge.target, edge.role)
    }
}
