//! Gateway shared state.

use std::sync::Arc;

use svgbridge_core::SharedCanvas;
use svgbridge_core::screenshot::ScreenshotExchange;
use svgbridge_tools::{ToolContext, ToolRegistry};

/// Shared gateway state accessible from all connections and handlers.
///
/// The canvas is the single shared mutable resource; both the agent-facing
/// tool dispatch and the browser-facing bridge reach it through the same
/// lock, so mutations from either side are linearized.
pub struct GatewayState {
    pub canvas: SharedCanvas,
    pub tools: Arc<ToolRegistry>,
    pub screenshot: Arc<ScreenshotExchange>,
}

impl GatewayState {
    pub fn new(canvas: SharedCanvas, tools: Arc<ToolRegistry>) -> Self {
        Self {
            canvas,
            tools,
            screenshot: Arc::new(ScreenshotExchange::new()),
        }
    }

    /// Build the execution context handed to tools.
    pub fn tool_context(&self) -> ToolContext {
        ToolContext {
            canvas: self.canvas.clone(),
            screenshot: self.screenshot.clone(),
        }
    }
}
