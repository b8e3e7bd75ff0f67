//! Browser-facing sync bridge — store-and-forward polling, last write wins.
//!
//! The browser holds an independent copy of the document and reconciles it
//! over two endpoints:
//!
//! - `GET /api/svg` — side-effect-free snapshot of the authoritative state.
//!   The peer applies it locally only when the returned version strictly
//!   exceeds the version it last applied or last pushed.
//! - `POST /api/svg` — full-document replacement. Acceptance is
//!   unconditional: a stale peer is not rejected, the last submission wins.
//!   After a push the peer adopts the returned version as its new baseline so
//!   it does not re-download its own write.
//!
//! Both sides mutating between polls loses one side's edits silently; that is
//! the documented cost of the policy, not an error. Malformed submissions are
//! rejected with 400 and leave the document untouched.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use svgbridge_core::codec;

use crate::state::GatewayState;

#[derive(Deserialize)]
pub struct SubmitBody {
    #[serde(default)]
    pub svg: String,
}

#[derive(Deserialize)]
pub struct ScreenshotBody {
    #[serde(default)]
    pub image: String,
}

/// `GET /api/svg` — the browser polls this for the current state.
pub async fn fetch_state(State(state): State<Arc<GatewayState>>) -> Response {
    let screenshot_requested = state.screenshot.requested().await;
    let doc = state.canvas.lock().await;
    Json(json!({
        "version": doc.version(),
        "width": doc.width,
        "height": doc.height,
        "svg": doc.serialize(),
        "elements": doc.list(),
        "layers": doc.layers(),
        "screenshot_requested": screenshot_requested,
    }))
    .into_response()
}

/// `POST /api/svg` — the browser pushes its current document.
pub async fn submit_state(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<SubmitBody>,
) -> Response {
    match codec::parse(&body.svg) {
        Ok(parsed) => {
            let mut doc = state.canvas.lock().await;
            let width = parsed.width.unwrap_or(doc.width);
            let height = parsed.height.unwrap_or(doc.height);
            doc.replace_all(parsed.elements, width, height);
            debug!(version = doc.version(), "Browser submission applied");
            Json(json!({ "version": doc.version(), "status": "ok" })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Rejected malformed browser submission");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// `POST /api/screenshot` — the browser delivers a capture the agent asked for.
pub async fn submit_screenshot(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<ScreenshotBody>,
) -> Response {
    if body.image.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing image data" })),
        )
            .into_response();
    }
    if base64::engine::general_purpose::STANDARD
        .decode(&body.image)
        .is_err()
    {
        warn!("Rejected screenshot payload that is not valid base64");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "image data is not valid base64" })),
        )
            .into_response();
    }
    state.screenshot.fulfill(body.image).await;
    Json(json!({ "status": "ok" })).into_response()
}
