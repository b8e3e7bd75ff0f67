//! Layer tools — list layers, toggle visibility, move elements between layers.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{Tool, ToolContext, ToolOutput, parse_params};

pub struct ListLayersTool;

#[async_trait]
impl Tool for ListLayersTool {
    fn name(&self) -> &str {
        "list_layers"
    }

    fn description(&self) -> &str {
        "List all layers with their properties (name, color, visibility)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let doc = context.canvas.lock().await;
        Ok(ToolOutput::json(json!({ "layers": doc.layers() })))
    }
}

pub struct SetLayerVisibilityTool;

#[derive(Deserialize)]
struct VisibilityParams {
    layer_name: String,
    visible: bool,
}

#[async_trait]
impl Tool for SetLayerVisibilityTool {
    fn name(&self) -> &str {
        "set_layer_visibility"
    }

    fn description(&self) -> &str {
        "Show or hide a layer. Hidden layers' elements are not displayed."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "layer_name": {
                    "type": "string",
                    "description": "Layer name (e.g. \"CUT_OUTSIDE\", \"ENGRAVE\", \"NOTES\")"
                },
                "visible": {
                    "type": "boolean",
                    "description": "true to show, false to hide"
                }
            },
            "required": ["layer_name", "visible"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let params: VisibilityParams = match parse_params(params) {
            Ok(p) => p,
            Err(out) => return Ok(out),
        };

        let mut doc = context.canvas.lock().await;
        match doc.set_layer_visibility(&params.layer_name, params.visible) {
            Ok(()) => Ok(ToolOutput::json(json!({
                "layer": params.layer_name,
                "visible": params.visible,
            }))),
            Err(e) => Ok(ToolOutput::error(e)),
        }
    }
}

pub struct SetElementLayerTool;

#[derive(Deserialize)]
struct ElementLayerParams {
    element_id: String,
    layer_name: String,
}

#[async_trait]
impl Tool for SetElementLayerTool {
    fn name(&self) -> &str {
        "set_element_layer"
    }

    fn description(&self) -> &str {
        "Move an element to a different layer."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "element_id": {
                    "type": "string",
                    "description": "The element ID (e.g. \"el-1\")"
                },
                "layer_name": {
                    "type": "string",
                    "description": "Target layer name (e.g. \"CUT_INSIDE\", \"ENGRAVE\")"
                }
            },
            "required": ["element_id", "layer_name"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let params: ElementLayerParams = match parse_params(params) {
            Ok(p) => p,
            Err(out) => return Ok(out),
        };

        let mut doc = context.canvas.lock().await;
        match doc.set_element_layer(&params.element_id, &params.layer_name) {
            Ok(()) => Ok(ToolOutput::json(json!({
                "id": params.element_id,
                "layer": params.layer_name,
            }))),
            Err(e) => Ok(ToolOutput::error(e)),
        }
    }
}
