//! Canvas size tool.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{Tool, ToolContext, ToolOutput, parse_params};

pub struct SetCanvasSizeTool;

#[derive(Deserialize)]
struct SizeParams {
    width: f64,
    height: f64,
}

#[async_trait]
impl Tool for SetCanvasSizeTool {
    fn name(&self) -> &str {
        "set_canvas_size"
    }

    fn description(&self) -> &str {
        "Set the canvas dimensions in mm (1 unit = 1mm)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "width": { "type": "number", "description": "Canvas width in mm" },
                "height": { "type": "number", "description": "Canvas height in mm" }
            },
            "required": ["width", "height"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let params: SizeParams = match parse_params(params) {
            Ok(p) => p,
            Err(out) => return Ok(out),
        };

        let mut doc = context.canvas.lock().await;
        match doc.set_size(params.width, params.height) {
            Ok(()) => Ok(ToolOutput::json(json!({
                "width": params.width,
                "height": params.height,
            }))),
            Err(e) => Ok(ToolOutput::error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_context;

    #[tokio::test]
    async fn test_set_size() {
        let ctx = test_context();
        let out = SetCanvasSizeTool
            .execute(json!({"width": 300.0, "height": 200.0}), &ctx)
            .await
            .unwrap();
        assert!(!out.is_error);

        let doc = ctx.canvas.lock().await;
        assert_eq!((doc.width, doc.height), (300.0, 200.0));
        assert_eq!(doc.version(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_size_rejected() {
        let ctx = test_context();
        let out = SetCanvasSizeTool
            .execute(json!({"width": 0.0, "height": 200.0}), &ctx)
            .await
            .unwrap();
        assert!(out.is_error);

        let doc = ctx.canvas.lock().await;
        assert_eq!((doc.width, doc.height), (100.0, 100.0));
        assert_eq!(doc.version(), 0);
    }
}
