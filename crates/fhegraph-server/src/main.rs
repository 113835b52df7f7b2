//! Binary entrypoint for the fhegraph debugger server.
//!
//! Configuration comes from environment variables; see
//! [`fhegraph_server::config`].

use std::io;

use fhegraph_server::config::ServerConfig;
use fhegraph_server::router::build_router;
use fhegraph_server::state::AppState;

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let state = if config.demo_session {
        AppState::with_demo().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    } else {
        AppState::new()
    };

    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("fhegraph debugger listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
