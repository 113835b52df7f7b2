//! Selection handlers: the HTTP face of the code panel and graph panel
//! callbacks.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

use fhegraph_core::SelectionSnapshot;

use crate::error::ApiError;
use crate::schema::selection::{LineClickRequest, NodeSelectionRequest};
use crate::state::AppState;

/// Returns the session's current selection and rendered graph.
///
/// `GET /sessions/{name}/selection`
pub async fn get_selection(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SelectionSnapshot>, ApiError> {
    let session = state.sessions.get(&name)?;
    let session = session.lock().await;
    Ok(Json(session.coordinator.snapshot()))
}

/// The code panel reports a line click.
///
/// `POST /sessions/{name}/selection/line`
pub async fn click_line(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<LineClickRequest>, JsonRejection>,
) -> Result<Json<SelectionSnapshot>, ApiError> {
    let Json(req) = payload?;
    let session = state.sessions.get(&name)?;
    let mut session = session.lock().await;
    session.coordinator.on_line_clicked(req.line);
    Ok(Json(session.coordinator.snapshot()))
}

/// The graph panel reports a selection change.
///
/// The ids are stored as given, like any selection the coordinator holds.
/// A selection is not checked against the displayed graph, and it survives
/// later line clicks even when the new graph lacks those nodes.
///
/// `POST /sessions/{name}/selection/nodes`
pub async fn select_nodes(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<NodeSelectionRequest>, JsonRejection>,
) -> Result<Json<SelectionSnapshot>, ApiError> {
    let Json(req) = payload?;
    let session = state.sessions.get(&name)?;
    let mut session = session.lock().await;
    session
        .coordinator
        .on_graph_selection_changed(req.node_ids.unwrap_or_default());
    Ok(Json(session.coordinator.snapshot()))
}
