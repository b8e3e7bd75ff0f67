//! Structural element tools — list, add, update, remove.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use svgbridge_core::canvas::DEFAULT_LAYER;

use crate::{Tool, ToolContext, ToolOutput, parse_params};

fn element_json(el: &svgbridge_core::SvgElement) -> serde_json::Value {
    json!({
        "id": el.id,
        "tag": el.tag,
        "attrs": el.attrs,
        "text": el.text,
        "layer": el.attr("data-layer").unwrap_or(DEFAULT_LAYER),
    })
}

// --- ListElementsTool ---

pub struct ListElementsTool;

#[async_trait]
impl Tool for ListElementsTool {
    fn name(&self) -> &str {
        "list_elements"
    }

    fn description(&self) -> &str {
        "List all SVG elements on the canvas with their IDs, attributes, and layer."
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
        let elements: Vec<serde_json::Value> = doc.list().iter().map(element_json).collect();
        Ok(ToolOutput::json(json!({
            "canvas": { "width": doc.width, "height": doc.height },
            "elements": elements,
        })))
    }
}

// --- AddElementTool ---

pub struct AddElementTool;

#[derive(Deserialize)]
struct AddParams {
    tag: String,
    #[serde(default)]
    attrs: IndexMap<String, String>,
    #[serde(default)]
    text: String,
    #[serde(default = "default_layer")]
    layer: String,
}

fn default_layer() -> String {
    DEFAULT_LAYER.to_string()
}

#[async_trait]
impl Tool for AddElementTool {
    fn name(&self) -> &str {
        "add_element"
    }

    fn description(&self) -> &str {
        "Add a new SVG element to the canvas. Returns the assigned element id."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "tag": {
                    "type": "string",
                    "description": "SVG element type — rect, circle, ellipse, line, text, path, polygon, polyline"
                },
                "attrs": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "SVG attributes, e.g. {\"x\":\"100\",\"y\":\"100\",\"width\":\"200\",\"fill\":\"#4a90d9\"}"
                },
                "text": {
                    "type": "string",
                    "description": "Text content (only for <text> elements)"
                },
                "layer": {
                    "type": "string",
                    "description": "Layer to assign the element to (default: CUT_OUTSIDE)"
                }
            },
            "required": ["tag"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let params: AddParams = match parse_params(params) {
            Ok(p) => p,
            Err(out) => return Ok(out),
        };

        let mut attrs = params.attrs;
        attrs.insert("data-layer".to_string(), params.layer.clone());

        let mut doc = context.canvas.lock().await;
        match doc.add(&params.tag, attrs, &params.text) {
            Ok(el) => {
                debug!(id = %el.id, tag = %el.tag, "Agent added element");
                Ok(ToolOutput::json(json!({
                    "id": el.id,
                    "tag": el.tag,
                    "attrs": el.attrs,
                    "layer": params.layer,
                })))
            }
            Err(e) => Ok(ToolOutput::error(e)),
        }
    }
}

// --- UpdateElementTool ---

pub struct UpdateElementTool;

#[derive(Deserialize)]
struct UpdateParams {
    element_id: String,
    attrs: IndexMap<String, String>,
}

#[async_trait]
impl Tool for UpdateElementTool {
    fn name(&self) -> &str {
        "update_element"
    }

    fn description(&self) -> &str {
        "Update attributes of an existing SVG element by ID. Existing keys are overwritten, new keys added."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "element_id": {
                    "type": "string",
                    "description": "The element ID (e.g. \"el-1\")"
                },
                "attrs": {
                    "type": "object",
                    "additionalProperties": { "type": "string" },
                    "description": "Attributes to set/update"
                }
            },
            "required": ["element_id", "attrs"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let params: UpdateParams = match parse_params(params) {
            Ok(p) => p,
            Err(out) => return Ok(out),
        };

        let mut doc = context.canvas.lock().await;
        match doc.update(&params.element_id, params.attrs) {
            Ok(el) => Ok(ToolOutput::json(json!({
                "id": el.id,
                "tag": el.tag,
                "attrs": el.attrs,
            }))),
            Err(e) => Ok(ToolOutput::error(e)),
        }
    }
}

// --- RemoveElementTool ---

pub struct RemoveElementTool;

#[derive(Deserialize)]
struct RemoveParams {
    element_id: String,
}

#[async_trait]
impl Tool for RemoveElementTool {
    fn name(&self) -> &str {
        "remove_element"
    }

    fn description(&self) -> &str {
        "Remove an SVG element by ID."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "element_id": {
                    "type": "string",
                    "description": "The element ID to remove (e.g. \"el-1\")"
                }
            },
            "required": ["element_id"]
        })
    }

    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        let params: RemoveParams = match parse_params(params) {
            Ok(p) => p,
            Err(out) => return Ok(out),
        };

        let mut doc = context.canvas.lock().await;
        match doc.remove(&params.element_id) {
            Ok(()) => Ok(ToolOutput::json(json!({
                "removed": true,
                "id": params.element_id,
            }))),
            Err(e) => Ok(ToolOutput::error(e)),
        }
    }
}
