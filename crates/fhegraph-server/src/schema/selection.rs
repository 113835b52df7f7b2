//! Selection event request types.
//!
//! Responses are [`fhegraph_core::SelectionSnapshot`]s, serialized as-is.

use fhegraph_core::NodeId;
use serde::Deserialize;

/// The code panel reports a click on a source line.
#[derive(Debug, Clone, Deserialize)]
pub struct LineClickRequest {
    pub line: i64,
}

/// The graph panel reports its current selection. `null` or a missing field
/// clears the selection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeSelectionRequest {
    #[serde(default)]
    pub node_ids: Option<Vec<NodeId>>,
}
