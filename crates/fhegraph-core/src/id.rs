//! Node identity for program graphs.
//!
//! A node is identified by its zero-based position in the owning graph's node
//! sequence, never by content: many `Multiply` nodes coexist in one program.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Positional node identifier. Maps to a petgraph `NodeIndex<u32>`.
///
/// Serializes as a bare integer, matching the `[source, target, role]` edge
/// triples of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of the node in its graph's node sequence.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between NodeId and petgraph's NodeIndex<u32>.

impl From<NodeIndex<u32>> for NodeId {
    fn from(idx: NodeIndex<u32>) -> Self {
        NodeId(idx.index() as u32)
    }
}

impl From<NodeId> for NodeIndex<u32> {
    fn from(id: NodeId) -> Self {
        NodeIndex::new(id.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(12);
        let node_id = NodeId::from(idx);
        assert_eq!(node_id.0, 12);

        let back: NodeIndex<u32> = node_id.into();
        assert_eq!(back.index(), 12);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(format!("{}", NodeId(7)), "7");
    }

    #[test]
    fn node_id_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&NodeId(42)).unwrap(), "42");
        let back: NodeId = serde_json::from_str("3").unwrap();
        assert_eq!(back, NodeId(3));
    }

    #[test]
    fn negative_index_is_rejected() {
        assert!(serde_json::from_str::<NodeId>("-1").is_err());
    }
}
