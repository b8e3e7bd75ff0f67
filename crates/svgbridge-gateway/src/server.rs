//! Axum server wiring the sync bridge and the agent WS endpoint together.

use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::bridge;
use crate::connection::handle_ws_connection;
use crate::state::GatewayState;

/// Build the gateway router. The bridge routes are CORS-permissive because
/// the browser peer may be served from a different origin than this process.
pub fn router(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_handler))
        .route(
            "/api/svg",
            get(bridge::fetch_state).post(bridge::submit_state),
        )
        .route("/api/screenshot", post(bridge::submit_screenshot))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway server and serve until shutdown.
pub async fn start_gateway(
    state: Arc<GatewayState>,
    bind_addr: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app = router(state);

    let addr = format!("{bind_addr}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let doc_version = state.canvas.lock().await.version();

    axum::Json(json!({
        "status": "ok",
        "version": version,
        "document_version": doc_version,
    }))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
