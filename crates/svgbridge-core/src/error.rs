use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Element '{0}' not found")]
    NotFound(String),

    #[error("Invalid element tag: {0}")]
    InvalidTag(String),

    #[error("Invalid canvas size: {width} x {height}")]
    InvalidSize { width: f64, height: f64 },

    #[error("Markup parse error: {0}")]
    Parse(String),

    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
