//! Configuration loading for the svgbridge binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_HTTP_PORT: u16 = 8765;
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Top-level svgbridge configuration (`svgbridge.json`).
///
/// Every section is optional; a missing file yields all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<CanvasConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address (default: 0.0.0.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,

    /// HTTP port for the bridge + WS endpoint (default: 8765).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Initial canvas width in internal units (1 unit = 1 mm on export).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset (e.g. "debug").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl Config {
    /// Default config file location: `./svgbridge.json`.
    pub fn default_path() -> PathBuf {
        PathBuf::from("svgbridge.json")
    }

    /// Load config from a JSON file; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn bind_addr(&self) -> String {
        self.gateway
            .as_ref()
            .and_then(|g| g.bind.clone())
            .unwrap_or_else(|| "0.0.0.0".to_string())
    }

    pub fn http_port(&self) -> u16 {
        self.gateway
            .as_ref()
            .and_then(|g| g.port)
            .unwrap_or(DEFAULT_HTTP_PORT)
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        let canvas = self.canvas.as_ref();
        (
            canvas
                .and_then(|c| c.width)
                .unwrap_or(DEFAULT_CANVAS_WIDTH),
            canvas
                .and_then(|c| c.height)
                .unwrap_or(DEFAULT_CANVAS_HEIGHT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Path::new("/nonexistent/svgbridge.json")).unwrap();
        assert_eq!(config.http_port(), DEFAULT_HTTP_PORT);
        assert_eq!(config.canvas_size(), (800.0, 600.0));
        assert_eq!(config.bind_addr(), "0.0.0.0");
    }

    #[test]
    fn test_sections_override_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"gateway": {"port": 9000}, "canvas": {"width": 300, "height": 200}}"#,
        )
        .unwrap();
        assert_eq!(config.http_port(), 9000);
        assert_eq!(config.canvas_size(), (300.0, 200.0));
    }
}
