//! Session management and graph inspection handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use fhegraph_core::render::{display_label, translate};
use fhegraph_core::{NodeId, ProgramGraph, RenderGraph};

use crate::error::ApiError;
use crate::schema::sessions::{
    decode_graphs, CreateSessionRequest, CreateSessionResponse, NodeDetailView, NodeLinkView,
    SessionListResponse,
};
use crate::session::DebugSession;
use crate::state::AppState;

/// Lists all sessions.
///
/// `GET /sessions`
pub async fn list_sessions(State(state): State<AppState>) -> Json<SessionListResponse> {
    Json(SessionListResponse {
        sessions: state.sessions.names(),
    })
}

/// Registers a new session.
///
/// `POST /sessions`
pub async fn create_session(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let Json(CreateSessionRequest {
        name,
        source_code,
        graph,
        lines,
    }) = payload?;
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("session name must not be empty".to_string()));
    }
    let (graph, lines) = decode_graphs(graph, lines)?;

    let response = CreateSessionResponse {
        name: name.clone(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        warnings: graph.integrity_warnings(),
    };
    let session = DebugSession::new(name, source_code, graph, lines)?;
    state.sessions.register(session)?;
    Ok(Json(response))
}

/// Removes a session.
///
/// `DELETE /sessions/{name}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.sessions.remove(&name)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Returns the session's full program graph in wire format.
///
/// `GET /sessions/{name}`
pub async fn get_graph(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ProgramGraph>, ApiError> {
    let session = state.sessions.get(&name)?;
    let session = session.lock().await;
    Ok(Json(session.graph.clone()))
}

/// Returns the session's full program graph translated for drawing.
///
/// `GET /sessions/{name}/render`
pub async fn get_render(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<RenderGraph>, ApiError> {
    let session = state.sessions.get(&name)?;
    let session = session.lock().await;
    Ok(Json(translate(&session.graph)?))
}

/// Returns the program's source code as plain text.
///
/// `GET /programs/{name}`
pub async fn get_source(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<String, ApiError> {
    let session = state.sessions.get(&name)?;
    let session = session.lock().await;
    Ok(session.source_code.clone())
}

/// Returns one node of the currently displayed graph with its neighbors.
///
/// Node ids refer to the graph shown for the selected line, the same ids the
/// graph panel reports selections in.
///
/// `GET /sessions/{name}/nodes/{node_id}`
pub async fn get_node(
    State(state): State<AppState>,
    Path((name, node_id)): Path<(String, u32)>,
) -> Result<Json<NodeDetailView>, ApiError> {
    let session = state.sessions.get(&name)?;
    let session = session.lock().await;
    let selection = session.coordinator.state();
    let graph = &selection.current_graph;
    let id = NodeId(node_id);
    let detail = graph.node_detail(id)?;

    let link = |(node, role): (NodeId, _)| NodeLinkView {
        node,
        label: graph
            .node(node)
            .map(|n| display_label(&n.operation))
            .unwrap_or_default(),
        role,
    };

    Ok(Json(NodeDetailView {
        id,
        label: display_label(&detail.operation),
        operation: detail.operation,
        operands: detail.operands.iter().copied().map(link).collect(),
        consumers: detail.consumers.iter().copied().map(link).collect(),
        selected: selection.selected_nodes.contains(&id),
    }))
}
