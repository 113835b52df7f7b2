//! ProgramGraph: the compiled FHE program as an ordered node sequence plus
//! operand edges.
//!
//! The graph is a plain container. It does not re-verify acyclicity, and it
//! only checks edge indices when asked ([`ProgramGraph::check_indices`]) or
//! when an edge is added through [`ProgramGraph::add_edge`]. Payloads decoded
//! with [`ProgramGraph::from_json`] keep whatever edges they carried so the
//! translator can reject them as a whole.
//!
//! # Arity invariants
//!
//! A well-formed graph gives every binary node exactly one `Left` and one
//! `Right` operand, every unary node exactly one `Unary` operand, and input
//! nodes none. Violations are reported as [`IntegrityWarning`]s rather than
//! errors: they make the program wrong but do not stop it from being drawn.

use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::edge::{Edge, EdgeRole};
use crate::error::CoreError;
use crate::id::NodeId;
use crate::node::ProgramNode;
use crate::ops::Operation;

/// A compiled FHE program graph.
///
/// Serializes to the viewer's wire format:
/// `{ "nodes": [{"operation": ...}], "edges": [[source, target, role]] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramGraph {
    nodes: Vec<ProgramNode>,
    edges: Vec<Edge>,
}

/// A violation of the per-node operand arity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// The node expects an operand in `role` but none arrives.
    MissingOperand { node: NodeId, role: EdgeRole },
    /// More than one edge feeds the same operand position.
    DuplicateOperand {
        node: NodeId,
        role: EdgeRole,
        count: usize,
    },
    /// An edge feeds an operand position the node's operation does not have
    /// (a `Unary` edge into `Add`, any edge into an input).
    UnexpectedOperand { node: NodeId, role: EdgeRole },
}

impl IntegrityWarning {
    /// The node the warning is about.
    pub fn node(&self) -> NodeId {
        match self {
            IntegrityWarning::MissingOperand { node, .. }
            | IntegrityWarning::DuplicateOperand { node, .. }
            | IntegrityWarning::UnexpectedOperand { node, .. } => *node,
        }
    }
}

impl fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityWarning::MissingOperand { node, role } => {
                write!(f, "node {} is missing its {:?} operand", node, role)
            }
            IntegrityWarning::DuplicateOperand { node, role, count } => {
                write!(f, "node {} has {} {:?} operands", node, count, role)
            }
            IntegrityWarning::UnexpectedOperand { node, role } => {
                write!(f, "node {} does not take a {:?} operand", node, role)
            }
        }
    }
}

/// Neighborhood of one node, as shown in the node inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDetail {
    pub id: NodeId,
    pub operation: Operation,
    /// Producers feeding this node, in operand order.
    pub operands: SmallVec<[(NodeId, EdgeRole); 2]>,
    /// Nodes consuming this node's value, by target index.
    pub consumers: Vec<(NodeId, EdgeRole)>,
}

impl ProgramGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        ProgramGraph::default()
    }

    /// Assembles a graph from already-built parts without checking them.
    pub fn from_parts(nodes: Vec<ProgramNode>, edges: Vec<Edge>) -> Self {
        ProgramGraph { nodes, edges }
    }

    /// Decodes a graph from its JSON wire format.
    ///
    /// Unknown operations, unknown edge roles, and malformed triples are all
    /// [`CoreError::InvalidGraph`]. Edge indices are not range-checked here.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decodes a graph from an already parsed JSON document.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        Ok(serde_json::from_value(value)?)
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn nodes(&self) -> &[ProgramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&ProgramNode> {
        self.nodes.get(id.index())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Appends a node and returns its positional id.
    pub fn add_node(&mut self, operation: Operation) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ProgramNode::new(operation));
        id
    }

    /// Appends an edge after checking both endpoints exist.
    pub fn add_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        role: EdgeRole,
    ) -> Result<(), CoreError> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(CoreError::NodeNotFound { id });
            }
        }
        self.edges.push(Edge::new(source, target, role));
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Structural checks
    // -----------------------------------------------------------------------

    /// Fails on the first edge whose source or target lies outside the node
    /// sequence.
    pub fn check_indices(&self) -> Result<(), CoreError> {
        for (position, edge) in self.edges.iter().enumerate() {
            for id in [edge.source, edge.target] {
                if !self.contains(id) {
                    return Err(CoreError::invalid(format!(
                        "edge {} ({} -> {}) references node {}, but the graph has {} nodes",
                        position,
                        edge.source,
                        edge.target,
                        id,
                        self.nodes.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Reports every arity violation, ordered by node then operand role.
    ///
    /// Edges with out-of-range endpoints are ignored; those are
    /// [`check_indices`](Self::check_indices)' business.
    pub fn integrity_warnings(&self) -> Vec<IntegrityWarning> {
        // Incoming edge counts per node, indexed Left / Right / Unary.
        let mut counts = vec![[0usize; 3]; self.nodes.len()];
        for edge in &self.edges {
            if self.contains(edge.source) {
                if let Some(slot) = counts.get_mut(edge.target.index()) {
                    slot[role_slot(edge.role)] += 1;
                }
            }
        }

        let mut warnings = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index as u32);
            let expected = node.operation.arity().operand_roles();
            for role in [EdgeRole::Left, EdgeRole::Right, EdgeRole::Unary] {
                let count = counts[index][role_slot(role)];
                if expected.contains(&role) {
                    match count {
                        0 => warnings.push(IntegrityWarning::MissingOperand { node: id, role }),
                        1 => {}
                        _ => warnings.push(IntegrityWarning::DuplicateOperand {
                            node: id,
                            role,
                            count,
                        }),
                    }
                } else if count > 0 {
                    warnings.push(IntegrityWarning::UnexpectedOperand { node: id, role });
                }
            }
        }
        warnings
    }

    // -----------------------------------------------------------------------
    // Traversal
    // -----------------------------------------------------------------------

    /// Builds a petgraph view of the program. Node indices are preserved.
    pub fn to_digraph(&self) -> Result<DiGraph<Operation, EdgeRole, u32>, CoreError> {
        self.check_indices()?;
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        for node in &self.nodes {
            graph.add_node(node.operation);
        }
        for edge in &self.edges {
            graph.add_edge(edge.source.into(), edge.target.into(), edge.role);
        }
        Ok(graph)
    }

    /// Returns the producers and consumers of one node.
    pub fn node_detail(&self, id: NodeId) -> Result<NodeDetail, CoreError> {
        let operation = self
            .node(id)
            .map(|node| node.operation)
            .ok_or(CoreError::NodeNotFound { id })?;
        let graph = self.to_digraph()?;
        let idx: NodeIndex<u32> = id.into();

        let mut operands: SmallVec<[(NodeId, EdgeRole); 2]> = graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| (NodeId::from(e.source()), *e.weight()))
            .collect();
        operands.sort_by_key(|(source, role)| (*role, *source));

        let mut consumers: Vec<(NodeId, EdgeRole)> = graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (NodeId::from(e.target()), *e.weight()))
            .collect();
        consumers.sort();

        Ok(NodeDetail {
            id,
            operation,
            operands,
            consumers,
        })
    }
}

fn role_slot(role: EdgeRole) -> usize {
    match role {
        EdgeRole::Left => 0,
        EdgeRole::Right => 1,
        EdgeRole::Unary => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample;

    fn multiply_pair() -> ProgramGraph {
        let mut graph = ProgramGraph::new();
        let a = graph.add_node(Operation::InputCiphertext(0));
        let b = graph.add_node(Operation::InputCiphertext(1));
        let m = graph.add_node(Operation::Multiply);
        graph.add_edge(a, m, EdgeRole::Left).unwrap();
        graph.add_edge(b, m, EdgeRole::Right).unwrap();
        graph
    }

    #[test]
    fn add_node_assigns_positional_ids() {
        let mut graph = ProgramGraph::new();
        assert_eq!(graph.add_node(Operation::Multiply), NodeId(0));
        assert_eq!(graph.add_node(Operation::Multiply), NodeId(1));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn add_edge_rejects_unknown_endpoint() {
        let mut graph = multiply_pair();
        let err = graph
            .add_edge(NodeId(0), NodeId(9), EdgeRole::Unary)
            .unwrap_err();
        assert_eq!(err, CoreError::NodeNotFound { id: NodeId(9) });
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn from_json_reads_wire_format() {
        let graph = ProgramGraph::from_json(
            r#"{
                "nodes": [
                    {"operation": {"InputCiphertext": 0}},
                    {"operation": "Relinearize"}
                ],
                "edges": [[0, 1, "Unary"]]
            }"#,
        )
        .unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges()[0], Edge::new(NodeId(0), NodeId(1), EdgeRole::Unary));
    }

    #[test]
    fn from_json_rejects_unknown_operation() {
        let err = ProgramGraph::from_json(
            r#"{"nodes": [{"operation": "Rotate"}], "edges": []}"#,
        )
        .unwrap_err();
        match err {
            CoreError::InvalidGraph { reason } => assert!(reason.contains("Rotate")),
            other => panic!("expected InvalidGraph, got {:?}", other),
        }
    }

    #[test]
    fn from_value_matches_from_json() {
        let value = serde_json::json!({
            "nodes": [{"operation": {"InputCiphertext": 0}}, {"operation": "Relinearize"}],
            "edges": [[0, 1, "Unary"]]
        });
        let graph = ProgramGraph::from_value(value.clone()).unwrap();
        assert_eq!(graph, ProgramGraph::from_json(&value.to_string()).unwrap());

        let err = ProgramGraph::from_value(serde_json::json!({
            "nodes": [{"operation": "Add"}],
            "edges": [[0, 0, "Middle"]]
        }))
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidGraph { ref reason } if reason.contains("Middle")));
    }

    #[test]
    fn from_json_keeps_out_of_range_edges() {
        let graph = ProgramGraph::from_json(
            r#"{"nodes": [{"operation": "Add"}], "edges": [[99, 0, "Left"]]}"#,
        )
        .unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert!(matches!(
            graph.check_indices(),
            Err(CoreError::InvalidGraph { .. })
        ));
    }

    #[test]
    fn wire_format_roundtrip_preserves_order() {
        let graph = sample::sample_program();
        let json = serde_json::to_string(&graph).unwrap();
        let back = ProgramGraph::from_json(&json).unwrap();
        assert_eq!(graph, back);
    }

    #[test]
    fn sample_program_is_well_formed() {
        let graph = sample::sample_program();
        assert!(graph.check_indices().is_ok());
        assert!(graph.integrity_warnings().is_empty());
    }

    #[test]
    fn missing_right_operand_is_reported() {
        let mut graph = ProgramGraph::new();
        let a = graph.add_node(Operation::InputCiphertext(0));
        let m = graph.add_node(Operation::Add);
        graph.add_edge(a, m, EdgeRole::Left).unwrap();

        assert_eq!(
            graph.integrity_warnings(),
            vec![IntegrityWarning::MissingOperand {
                node: m,
                role: EdgeRole::Right
            }]
        );
    }

    #[test]
    fn duplicate_and_unexpected_operands_are_reported() {
        let mut graph = ProgramGraph::new();
        let a = graph.add_node(Operation::InputCiphertext(0));
        let b = graph.add_node(Operation::InputCiphertext(1));
        let r = graph.add_node(Operation::Relinearize);
        graph.add_edge(a, r, EdgeRole::Unary).unwrap();
        graph.add_edge(b, r, EdgeRole::Unary).unwrap();
        graph.add_edge(r, a, EdgeRole::Left).unwrap();

        let warnings = graph.integrity_warnings();
        assert_eq!(
            warnings,
            vec![
                IntegrityWarning::UnexpectedOperand {
                    node: a,
                    role: EdgeRole::Left
                },
                IntegrityWarning::DuplicateOperand {
                    node: r,
                    role: EdgeRole::Unary,
                    count: 2
                },
            ]
        );
        assert_eq!(warnings[1].node(), r);
        assert_eq!(warnings[1].to_string(), "node 2 has 2 Unary operands");
    }

    #[test]
    fn warning_serializes_with_kind_tag() {
        let warning = IntegrityWarning::MissingOperand {
            node: NodeId(4),
            role: EdgeRole::Left,
        };
        let json = serde_json::to_value(warning).unwrap();
        assert_eq!(json["kind"], "missing_operand");
        assert_eq!(json["node"], 4);
        assert_eq!(json["role"], "Left");
    }

    #[test]
    fn node_detail_lists_operands_in_order() {
        let graph = sample::sample_program();
        // Node 7 adds the two relinearized products.
        let detail = graph.node_detail(NodeId(7)).unwrap();
        assert_eq!(detail.operation, Operation::Add);
        assert_eq!(
            detail.operands.as_slice(),
            &[(NodeId(6), EdgeRole::Left), (NodeId(8), EdgeRole::Right)]
        );
        assert_eq!(detail.consumers, vec![(NodeId(11), EdgeRole::Unary)]);
    }

    #[test]
    fn node_detail_of_input_has_consumers_only() {
        let graph = multiply_pair();
        let detail = graph.node_detail(NodeId(1)).unwrap();
        assert!(detail.operands.is_empty());
        assert_eq!(detail.consumers, vec![(NodeId(2), EdgeRole::Right)]);
    }

    #[test]
    fn node_detail_unknown_node() {
        let graph = multiply_pair();
        assert_eq!(
            graph.node_detail(NodeId(3)).unwrap_err(),
            CoreError::NodeNotFound { id: NodeId(3) }
        );
    }

    #[test]
    fn digraph_preserves_indices() {
        let graph = sample::sample_program();
        let digraph = graph.to_digraph().unwrap();
        assert_eq!(digraph.node_count(), 13);
        assert_eq!(digraph.edge_count(), 13);
        assert_eq!(digraph[NodeIndex::new(7)], Operation::Add);
    }
}
