//! Agent RPC wire protocol.
//!
//! Tool calls travel as JSON-over-WebSocket request/response frames. The
//! framing is deliberately thin — `method` names a registered tool, `params`
//! is the tool's argument object.

use serde::{Deserialize, Serialize};

/// A wire frame — the top-level message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RpcFrame {
    /// Client -> Server tool invocation.
    #[serde(rename = "req")]
    Request {
        id: String,
        method: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },

    /// Server -> Client result.
    #[serde(rename = "res")]
    Response {
        id: String,
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        payload: Option<serde_json::Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<ErrorShape>,
    },
}

/// Error shape returned in response frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorShape {
    pub code: String,
    pub message: String,
}

impl RpcFrame {
    pub fn ok(id: impl Into<String>, payload: serde_json::Value) -> Self {
        RpcFrame::Response {
            id: id.into(),
            ok: true,
            payload: Some(payload),
            error: None,
        }
    }

    pub fn error(id: impl Into<String>, code: &str, message: impl Into<String>) -> Self {
        RpcFrame::Response {
            id: id.into(),
            ok: false,
            payload: None,
            error: Some(ErrorShape {
                code: code.to_string(),
                message: message.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_frame_wire_shape() {
        let frame: RpcFrame = serde_json::from_str(
            r#"{"type":"req","id":"1","method":"add_element","params":{"tag":"rect"}}"#,
        )
        .unwrap();
        match frame {
            RpcFrame::Request { id, method, params } => {
                assert_eq!(id, "1");
                assert_eq!(method, "add_element");
                assert_eq!(params.unwrap()["tag"], "rect");
            }
            _ => panic!("expected request frame"),
        }
    }

    #[test]
    fn test_error_response_serializes_code() {
        let frame = RpcFrame::error("7", "method_not_found", "no such tool");
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "res");
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "method_not_found");
    }
}
