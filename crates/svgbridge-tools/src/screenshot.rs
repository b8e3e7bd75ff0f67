//! Screenshot tool — delegate a capture to the connected browser.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::{Tool, ToolContext, ToolMedia, ToolOutput};

/// How long to wait for the polling browser to deliver a capture.
const CAPTURE_DEADLINE: Duration = Duration::from_secs(10);

pub struct TakeScreenshotTool;

#[async_trait]
impl Tool for TakeScreenshotTool {
    fn name(&self) -> &str {
        "take_screenshot"
    }

    fn description(&self) -> &str {
        "Request a screenshot of the current SVG canvas from the browser. The browser must be connected (polling) for this to work. Returns PNG image data."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(
        &self,
        _params: serde_json::Value,
        context: &ToolContext,
    ) -> anyhow::Result<ToolOutput> {
        match context.screenshot.capture(CAPTURE_DEADLINE).await {
            Some(data) => Ok(ToolOutput {
                content: "Screenshot captured".to_string(),
                is_error: false,
                media: Some(vec![ToolMedia {
                    mime_type: "image/png".to_string(),
                    data,
                }]),
            }),
            None => {
                warn!("Screenshot request timed out");
                Ok(ToolOutput::error(
                    "timeout waiting for the browser to capture a screenshot; is the browser connected?",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_context;

    #[tokio::test]
    async fn test_screenshot_round_trip() {
        let ctx = test_context();

        let exchange = ctx.screenshot.clone();
        tokio::spawn(async move {
            while !exchange.requested().await {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            exchange.fulfill("iVBORw0KGgo=".to_string()).await;
        });

        let out = TakeScreenshotTool.execute(json!({}), &ctx).await.unwrap();
        assert!(!out.is_error);
        let media = out.media.unwrap();
        assert_eq!(media[0].mime_type, "image/png");
        assert_eq!(media[0].data, "iVBORw0KGgo=");
    }

    #[tokio::test(start_paused = true)]
    async fn test_screenshot_timeout_is_error() {
        let ctx = test_context();
        let out = TakeScreenshotTool.execute(json!({}), &ctx).await.unwrap();
        assert!(out.is_error);
        assert!(!ctx.screenshot.requested().await);
    }
}
