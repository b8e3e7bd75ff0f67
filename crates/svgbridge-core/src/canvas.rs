//! The authoritative canvas document.
//!
//! A single process-wide [`CanvasDocument`] holds the ordered element list,
//! canvas size, and the version counter every mutation bumps. All access goes
//! through [`SharedCanvas`], which wraps the document in one exclusive lock so
//! every observed `(content, version)` pair is consistent and writes are
//! linearized.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::codec;
use crate::element::SvgElement;
use crate::error::{CanvasError, Result};

/// A named drawing layer. Elements reference layers via their `data-layer`
/// attribute; layer state itself lives on the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInfo {
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub stroke_dash: String,
    pub visible: bool,
}

impl LayerInfo {
    fn new(name: &str, color: &str, stroke_dash: &str) -> Self {
        Self {
            name: name.to_string(),
            color: color.to_string(),
            stroke_dash: stroke_dash.to_string(),
            visible: true,
        }
    }
}

/// Layer an element lands on when none is specified.
pub const DEFAULT_LAYER: &str = "CUT_OUTSIDE";

fn default_layers() -> Vec<LayerInfo> {
    vec![
        LayerInfo::new("CUT_OUTSIDE", "#e74c3c", ""),
        LayerInfo::new("CUT_INSIDE", "#e74c3c", "6 3"),
        LayerInfo::new("ENGRAVE", "#3498db", ""),
        LayerInfo::new("NOTES", "#2ecc71", ""),
    ]
}

/// The authoritative SVG document: ordered elements (paint order), size,
/// layers, and the monotonic version/identity counters.
///
/// Failed operations never bump the version and never partially apply.
#[derive(Debug, Clone)]
pub struct CanvasDocument {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    layers: Vec<LayerInfo>,
    next_id: u64,
    version: u64,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl CanvasDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            layers: default_layers(),
            next_id: 1,
            version: 0,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Snapshot of the element sequence, isolated from further mutation.
    pub fn list(&self) -> Vec<SvgElement> {
        self.elements.clone()
    }

    pub fn get(&self, id: &str) -> Option<&SvgElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn layers(&self) -> &[LayerInfo] {
        &self.layers
    }

    fn fresh_id(&mut self) -> String {
        let id = format!("el-{}", self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a new element and return it. Text content is kept only for
    /// `text` elements; other tags ignore it so serialization stays the exact
    /// inverse of parsing.
    pub fn add(
        &mut self,
        tag: &str,
        attrs: IndexMap<String, String>,
        text: &str,
    ) -> Result<SvgElement> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(CanvasError::InvalidTag("empty tag name".to_string()));
        }
        let mut el = SvgElement::new(self.fresh_id(), tag);
        el.attrs = attrs;
        if tag == "text" {
            el.text = text.to_string();
        }
        self.elements.push(el.clone());
        self.version += 1;
        debug!(id = %el.id, tag = %el.tag, version = self.version, "Element added");
        Ok(el)
    }

    /// Merge attributes into an existing element (overwrite on collision).
    pub fn update(&mut self, id: &str, attrs: IndexMap<String, String>) -> Result<SvgElement> {
        let el = self
            .elements
            .iter_mut()
            .find(|el| el.id == id)
            .ok_or_else(|| CanvasError::NotFound(id.to_string()))?;
        for (k, v) in attrs {
            el.attrs.insert(k, v);
        }
        let updated = el.clone();
        self.version += 1;
        Ok(updated)
    }

    /// Remove an element. Its identity is never reassigned.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let idx = self
            .elements
            .iter()
            .position(|el| el.id == id)
            .ok_or_else(|| CanvasError::NotFound(id.to_string()))?;
        self.elements.remove(idx);
        self.version += 1;
        Ok(())
    }

    pub fn set_size(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width > 0.0 && width.is_finite() && height > 0.0 && height.is_finite()) {
            return Err(CanvasError::InvalidSize { width, height });
        }
        self.width = width;
        self.height = height;
        self.version += 1;
        Ok(())
    }

    /// Wholesale replacement of the element sequence and size — the last-write-wins
    /// swap used by markup ingestion and the sync bridge. No diffing against the
    /// old sequence; exactly one version bump regardless of how much changed.
    pub fn replace_all(&mut self, mut elements: Vec<SvgElement>, width: f64, height: f64) {
        self.ensure_ids(&mut elements);
        self.elements = elements;
        self.width = width;
        self.height = height;
        self.version += 1;
        debug!(
            elements = self.elements.len(),
            version = self.version,
            "Document replaced"
        );
    }

    /// Assign fresh identities to id-less (or duplicated) elements and advance
    /// the identity counter past any `el-N` already present, so a future `add`
    /// can never collide. The counter only moves forward. A numeric suffix the
    /// counter cannot move past is ignored rather than wrapped.
    fn ensure_ids(&mut self, elements: &mut [SvgElement]) {
        for el in elements.iter() {
            let past = el
                .id
                .strip_prefix("el-")
                .and_then(|s| s.parse::<u64>().ok())
                .and_then(|n| n.checked_add(1));
            if let Some(past) = past {
                self.next_id = self.next_id.max(past);
            }
        }
        let mut seen: HashSet<String> = HashSet::new();
        for el in elements.iter_mut() {
            if el.id.is_empty() || !seen.insert(el.id.clone()) {
                el.id = self.fresh_id();
                seen.insert(el.id.clone());
            }
        }
    }

    pub fn set_layer_visibility(&mut self, name: &str, visible: bool) -> Result<()> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| CanvasError::LayerNotFound(name.to_string()))?;
        layer.visible = visible;
        self.version += 1;
        Ok(())
    }

    /// Move an element to a different layer via its `data-layer` attribute.
    pub fn set_element_layer(&mut self, id: &str, layer: &str) -> Result<()> {
        if !self.layers.iter().any(|l| l.name == layer) {
            return Err(CanvasError::LayerNotFound(layer.to_string()));
        }
        let el = self
            .elements
            .iter_mut()
            .find(|el| el.id == id)
            .ok_or_else(|| CanvasError::NotFound(id.to_string()))?;
        el.set_attr("data-layer", layer);
        self.version += 1;
        Ok(())
    }

    /// Internal-mode markup for the whole document.
    pub fn serialize(&self) -> String {
        codec::serialize_internal(&self.elements, self.width, self.height)
    }

    /// Export-mode markup (physical units) for fabrication hand-off. Never fed
    /// back into `replace_all`.
    pub fn serialize_export(&self) -> String {
        codec::serialize_export(&self.elements, self.width, self.height)
    }
}

/// The process-scoped canvas behind its single exclusive lock.
///
/// Cloning is cheap (it shares the same document). Both the tool layer and the
/// sync bridge receive a clone at startup; no other path reaches the document.
#[derive(Clone, Default)]
pub struct SharedCanvas(Arc<Mutex<CanvasDocument>>);

impl SharedCanvas {
    pub fn new(doc: CanvasDocument) -> Self {
        Self(Arc::new(Mutex::new(doc)))
    }

    /// Acquire the document lock. Hold it only for in-memory work — never
    /// across an await point.
    pub async fn lock(&self) -> MutexGuard<'_, CanvasDocument> {
        self.0.lock().await
    }
}
