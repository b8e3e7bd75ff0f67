//! Markup tools — read the canvas as SVG text.
//!
//! `get_svg` returns the internal form (unit-less, round-trippable);
//! `export_svg` returns the fabrication hand-off form (mm units, identity
//! viewBox). The two are distinct on purpose: export output must never be
//! pushed back through the sync bridge.

use async_trait::async_trait;
use serde_json::json;

use crate::{Tool, ToolContext, ToolOutput};

pub struct GetSvgTool;

#[async_trait]
impl Tool for GetSvgTool {
    fn name(&self) -> &str {
        "get_svg"
    }

    fn description(&self) -> &str {
        "Get the full SVG markup of the canvas."
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
        Ok(ToolOutput::text(doc.serialize()))
    }
}

pub struct ExportSvgTool;

#[async_trait]
impl Tool for ExportSvgTool {
    fn name(&self) -> &str {
        "export_svg"
    }

    fn description(&self) -> &str {
        "Export the canvas as SVG for fabrication: dimensions in mm with a 1 unit = 1 mm viewBox. Do not feed this form back into the editor."
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
        Ok(ToolOutput::text(doc.serialize_export()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::AddElementTool;
    use crate::test_context;

    #[tokio::test]
    async fn test_get_svg_returns_internal_markup() {
        let ctx = test_context();
        AddElementTool
            .execute(json!({"tag": "circle", "attrs": {"r": "5"}}), &ctx)
            .await
            .unwrap();

        let out = GetSvgTool.execute(json!({}), &ctx).await.unwrap();
        assert!(out.content.starts_with("<svg"));
        assert!(out.content.contains("width=\"100\""));
        assert!(out.content.contains("<circle id=\"el-1\""));
        assert!(!out.content.contains("mm"));
    }

    #[tokio::test]
    async fn test_export_svg_is_annotated() {
        let ctx = test_context();
        let out = ExportSvgTool.execute(json!({}), &ctx).await.unwrap();
        assert!(out.content.contains("width=\"100mm\""));
        assert!(out.content.contains("viewBox=\"0 0 100 100\""));
    }
}
