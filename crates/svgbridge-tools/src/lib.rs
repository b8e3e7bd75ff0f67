//! Built-in canvas tools for the automation agent.
//!
//! Tools are the structural mutation surface of the shared document. Each
//! tool implements the [`Tool`] trait; the gateway dispatches RPC requests to
//! a [`ToolRegistry`] by tool name.
//!
//! Domain failures (unknown element, bad size, and so on) are reported as
//! `is_error` outputs the agent can read and recover from — `Err` is reserved
//! for genuinely unexpected conditions.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use svgbridge_core::SharedCanvas;
use svgbridge_core::screenshot::ScreenshotExchange;

pub mod canvas_size;
pub mod elements;
pub mod layers;
pub mod markup;
pub mod screenshot;

/// Context provided to tools during execution.
#[derive(Clone)]
pub struct ToolContext {
    pub canvas: SharedCanvas,
    pub screenshot: Arc<ScreenshotExchange>,
}

/// Output from a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Vec<ToolMedia>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMedia {
    pub mime_type: String,
    pub data: String,
}

impl ToolOutput {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
            media: None,
        }
    }

    pub fn json(value: serde_json::Value) -> Self {
        Self::text(value.to_string())
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: format!("Error: {message}"),
            is_error: true,
            media: None,
        }
    }
}

/// Deserialize tool parameters, turning bad arguments into an error output
/// rather than a hard failure.
pub(crate) fn parse_params<T: DeserializeOwned>(
    params: serde_json::Value,
) -> Result<T, ToolOutput> {
    serde_json::from_value(params)
        .map_err(|e| ToolOutput::error(format!("invalid parameters: {e}")))
}

/// The core tool trait. Every canvas tool implements this.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as exposed to the agent (e.g., "add_element").
    fn name(&self) -> &str;

    /// JSON Schema describing the tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Human-readable description for the agent.
    fn description(&self) -> &str;

    /// Execute the tool with the given parameters.
    async fn execute(
        &self,
        params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput>;
}

/// Registry of available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Generate tool definitions for the agent's tool-call API.
    pub fn to_llm_tools(&self) -> Vec<serde_json::Value> {
        self.tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "description": t.description(),
                    "input_schema": t.parameters_schema(),
                })
            })
            .collect()
    }
}

/// Register all built-in canvas tools.
pub fn register_builtin_tools(registry: &mut ToolRegistry) {
    registry.register(Box::new(elements::ListElementsTool));
    registry.register(Box::new(elements::AddElementTool));
    registry.register(Box::new(elements::UpdateElementTool));
    registry.register(Box::new(elements::RemoveElementTool));
    registry.register(Box::new(markup::GetSvgTool));
    registry.register(Box::new(markup::ExportSvgTool));
    registry.register(Box::new(canvas_size::SetCanvasSizeTool));
    registry.register(Box::new(screenshot::TakeScreenshotTool));
    registry.register(Box::new(layers::ListLayersTool));
    registry.register(Box::new(layers::SetLayerVisibilityTool));
    registry.register(Box::new(layers::SetElementLayerTool));
}

#[cfg(test)]
pub(crate) fn test_context() -> ToolContext {
    use svgbridge_core::CanvasDocument;

    ToolContext {
        canvas: SharedCanvas::new(CanvasDocument::new(100.0, 100.0)),
        screenshot: Arc::new(ScreenshotExchange::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_complete() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry);
        for name in [
            "list_elements",
            "add_element",
            "update_element",
            "remove_element",
            "get_svg",
            "export_svg",
            "set_canvas_size",
            "take_screenshot",
            "list_layers",
            "set_layer_visibility",
            "set_element_layer",
        ] {
            assert!(registry.get(name).is_some(), "missing tool {name}");
        }
        assert_eq!(registry.list().len(), 11);
    }

    #[test]
    fn test_llm_tool_definitions_carry_schemas() {
        let mut registry = ToolRegistry::new();
        register_builtin_tools(&mut registry);
        for def in registry.to_llm_tools() {
            assert!(def["name"].is_string());
            assert!(def["description"].is_string());
            assert_eq!(def["input_schema"]["type"], "object");
        }
    }
}
