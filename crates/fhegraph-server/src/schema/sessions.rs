//! Session management and graph inspection request/response types.

use std::collections::BTreeMap;

use fhegraph_core::{EdgeRole, IntegrityWarning, NodeId, Operation, ProgramGraph};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Request to register a new debug session.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionRequest {
    /// Unique session name.
    pub name: String,
    /// Source code of the program, shown in the code panel.
    #[serde(default)]
    pub source_code: String,
    /// The compiled program graph in wire format. Decoded by the handler so
    /// an unknown operation or role is reported as an invalid graph.
    pub graph: serde_json::Value,
    /// Per-line graph overrides. Lines without an entry show `graph`.
    #[serde(default)]
    pub lines: BTreeMap<i64, serde_json::Value>,
}

/// Decodes a registration's main graph and every line override.
pub fn decode_graphs(
    graph: serde_json::Value,
    lines: BTreeMap<i64, serde_json::Value>,
) -> Result<(ProgramGraph, BTreeMap<i64, ProgramGraph>), ApiError> {
    let graph = ProgramGraph::from_value(graph)?;
    let lines = lines
        .into_iter()
        .map(|(line, value)| {
            ProgramGraph::from_value(value)
                .map(|graph| (line, graph))
                .map_err(|err| ApiError::BadRequest(format!("graph for line {}: {}", line, err)))
        })
        .collect::<Result<_, _>>()?;
    Ok((graph, lines))
}

/// Response from registering a session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    /// Arity violations in the registered graph. The session is created
    /// regardless; offending nodes render as problematic.
    pub warnings: Vec<IntegrityWarning>,
}

/// Response for listing all sessions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionListResponse {
    /// Session names, sorted.
    pub sessions: Vec<String>,
}

/// One operand or consumer link of an inspected node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeLinkView {
    pub node: NodeId,
    pub label: String,
    pub role: EdgeRole,
}

/// Inspector payload for a single node of the displayed graph.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDetailView {
    pub id: NodeId,
    pub label: String,
    pub operation: Operation,
    /// Producers feeding this node, in operand order.
    pub operands: Vec<NodeLinkView>,
    /// Nodes consuming this node's value.
    pub consumers: Vec<NodeLinkView>,
    /// Whether the node is part of the current graph selection.
    pub selected: bool,
}
