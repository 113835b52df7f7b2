//! Router assembly for the debugger HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with CORS and
//! tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// Routes use axum 0.8 `/{param}` path syntax. CORS is permissive because the
/// viewer front end is served from its own origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Sessions
        .route(
            "/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route(
            "/sessions/{name}",
            get(handlers::sessions::get_graph).delete(handlers::sessions::delete_session),
        )
        .route(
            "/sessions/{name}/render",
            get(handlers::sessions::get_render),
        )
        .route(
            "/sessions/{name}/nodes/{node_id}",
            get(handlers::sessions::get_node),
        )
        .route("/programs/{name}", get(handlers::sessions::get_source))
        // Selection linkage
        .route(
            "/sessions/{name}/selection",
            get(handlers::selection::get_selection),
        )
        .route(
            "/sessions/{name}/selection/line",
            post(handlers::selection::click_line),
        )
        .route(
            "/sessions/{name}/selection/nodes",
            post(handlers::selection::select_nodes),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
