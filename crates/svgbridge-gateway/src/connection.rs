//! Agent WebSocket connection — JSON request/response frames over `/ws`.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use svgbridge_core::protocol::RpcFrame;

use crate::state::GatewayState;

/// Handle a new agent connection: read request frames, dispatch to tools,
/// write response frames. One response per request, in arrival order.
pub async fn handle_ws_connection(state: Arc<GatewayState>, ws: WebSocket) {
    let conn_id = Uuid::new_v4().to_string();
    info!(conn_id = %conn_id, "Agent connected");

    let (mut ws_tx, mut ws_rx) = ws.split();

    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = match serde_json::from_str::<RpcFrame>(&text) {
                    Ok(RpcFrame::Request { id, method, params }) => {
                        dispatch_tool(&state, &id, &method, params).await
                    }
                    Ok(_) => RpcFrame::error("", "invalid_frame", "expected a request frame"),
                    Err(e) => {
                        warn!(conn_id = %conn_id, error = %e, "Malformed frame");
                        RpcFrame::error("", "invalid_frame", format!("malformed frame: {e}"))
                    }
                };
                match serde_json::to_string(&response) {
                    Ok(encoded) => {
                        if ws_tx.send(Message::Text(encoded.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(conn_id = %conn_id, error = %e, "Failed to encode response"),
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = ws_tx.send(Message::Pong(payload)).await;
            }
            Ok(Message::Close(_)) | Err(_) => break,
            _ => {}
        }
    }

    debug!(conn_id = %conn_id, "Agent disconnected");
}

/// Dispatch one tool request and shape the response frame.
pub async fn dispatch_tool(
    state: &Arc<GatewayState>,
    request_id: &str,
    method: &str,
    params: Option<serde_json::Value>,
) -> RpcFrame {
    debug!(method, "Dispatching tool");

    let Some(tool) = state.tools.get(method) else {
        return RpcFrame::error(
            request_id,
            "method_not_found",
            format!("Unknown tool: {method}"),
        );
    };

    let context = state.tool_context();
    let params = params.unwrap_or_else(|| json!({}));
    match tool.execute(params, &context).await {
        Ok(output) if output.is_error => RpcFrame::error(request_id, "tool_error", output.content),
        Ok(output) => {
            let mut payload = json!({ "content": output.content });
            if let Some(media) = output.media {
                payload["media"] = json!(media);
            }
            RpcFrame::ok(request_id, payload)
        }
        Err(e) => {
            warn!(method, error = %e, "Tool execution failed");
            RpcFrame::error(request_id, "tool_failed", e.to_string())
        }
    }
}
