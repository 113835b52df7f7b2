//! Graph translator: [`ProgramGraph`] to the flat node/edge arrays consumed by
//! the graph-drawing widget.
//!
//! The projection is structure-preserving. Node `i` of the program becomes
//! render node `i`, and edge `k` becomes render edge `k`. Nothing is merged,
//! dropped, or reordered, so a selection reported by the widget maps straight
//! back onto program node indices.

use serde::Serialize;

use crate::edge::EdgeRole;
use crate::error::CoreError;
use crate::graph::{IntegrityWarning, ProgramGraph};
use crate::id::NodeId;
use crate::ops::Operation;

/// Node styling understood by the graph widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualKind {
    /// An encrypted program input.
    Input,
    /// Any other operation.
    Empty,
    /// Highlighted because of an integrity problem. Never produced by
    /// [`translate`] itself.
    Problematic,
}

/// One drawable node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderNode {
    pub id: NodeId,
    #[serde(rename = "title")]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: VisualKind,
}

/// One drawable edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub role: EdgeRole,
}

/// The full payload handed to the graph widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderGraph {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
    /// Arity violations found while translating.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<IntegrityWarning>,
}

impl RenderGraph {
    pub fn node(&self, id: NodeId) -> Option<&RenderNode> {
        self.nodes.get(id.index())
    }

    /// Restyles the given nodes as [`VisualKind::Problematic`]. Ids outside
    /// the graph are ignored.
    pub fn mark_problematic(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        for id in ids {
            if let Some(node) = self.nodes.get_mut(id.index()) {
                node.kind = VisualKind::Problematic;
            }
        }
    }

    /// Ids of nodes currently styled as problematic.
    pub fn problematic(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.kind == VisualKind::Problematic)
            .map(|n| n.id)
            .collect()
    }
}

/// User-visible label of an operation: the slot number for inputs, the variant
/// name for everything else.
pub fn display_label(operation: &Operation) -> String {
    match operation {
        Operation::InputCiphertext(slot) => slot.to_string(),
        other => other.name().to_string(),
    }
}

/// Translates a program graph into its render form.
///
/// Fails with [`CoreError::InvalidGraph`] if any edge references a node
/// outside the graph; in that case nothing is returned. Arity violations do not
/// fail the translation and are carried in [`RenderGraph::warnings`].
pub fn translate(graph: &ProgramGraph) -> Result<RenderGraph, CoreError> {
    graph.check_indices()?;

    let nodes = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| RenderNode {
            id: NodeId(index as u32),
            label: display_label(&node.operation),
            kind: if node.operation.is_input() {
                VisualKind::Input
            } else {
                VisualKind::Empty
            },
        })
        .collect();

    let edges = graph
        .edges()
        .iter()
        .map(|edge| RenderEdge {
            source: edge.source,
            target: edge.target,
            role: edge.role,
        })
        .collect();

    Ok(RenderGraph {
        nodes,
        edges,
        warnings: graph.integrity_warnings(),
    })
}
