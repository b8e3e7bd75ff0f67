//! Core types, config, errors, and the shared canvas document for svgbridge.

pub mod canvas;
pub mod codec;
pub mod config;
pub mod element;
pub mod error;
pub mod protocol;
pub mod screenshot;

pub use canvas::{CanvasDocument, LayerInfo, SharedCanvas};
pub use element::SvgElement;
pub use error::{CanvasError, Result};
