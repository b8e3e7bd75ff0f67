//! The element model — one drawable node of the canvas document.

use indexmap::IndexMap;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// A single drawable node: identity, tag, attributes, optional text content.
///
/// Attribute insertion order is preserved so serialization is stable across
/// round-trips. No attribute semantics are validated here — numeric ranges,
/// units, and the like are a UI concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvgElement {
    pub id: String,
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    #[serde(default)]
    pub text: String,
}

impl SvgElement {
    pub fn new(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            attrs: IndexMap::new(),
            text: String::new(),
        }
    }

    /// Get an attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Set an attribute, replacing any existing value for the key.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Render this element as a single markup tag.
    ///
    /// `id` always comes first, remaining attributes in insertion order.
    /// Elements with text content get an open/close pair with escaped text,
    /// everything else self-closes.
    pub fn to_markup(&self) -> String {
        let mut out = format!("<{} id=\"{}\"", self.tag, escape(&self.id));
        for (k, v) in &self.attrs {
            out.push_str(&format!(" {k}=\"{}\"", escape(v)));
        }
        if self.text.is_empty() {
            out.push_str("/>");
        } else {
            out.push_str(&format!(">{}</{}>", escape(&self.text), self.tag));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_markup() {
        let mut el = SvgElement::new("el-1", "circle");
        el.set_attr("cx", "10");
        el.set_attr("cy", "20");
        el.set_attr("r", "5");
        assert_eq!(el.to_markup(), r#"<circle id="el-1" cx="10" cy="20" r="5"/>"#);
    }

    #[test]
    fn test_text_markup_escapes_content() {
        let mut el = SvgElement::new("el-2", "text");
        el.set_attr("x", "4");
        el.text = "a < b & c".to_string();
        assert_eq!(
            el.to_markup(),
            r#"<text id="el-2" x="4">a &lt; b &amp; c</text>"#
        );
    }

    #[test]
    fn test_attribute_values_escaped() {
        let mut el = SvgElement::new("el-3", "rect");
        el.set_attr("data-note", "\"quoted\"");
        assert_eq!(
            el.to_markup(),
            r#"<rect id="el-3" data-note="&quot;quoted&quot;"/>"#
        );
    }

    #[test]
    fn test_set_attr_overwrites() {
        let mut el = SvgElement::new("el-4", "rect");
        el.set_attr("fill", "red");
        el.set_attr("fill", "blue");
        assert_eq!(el.attr("fill"), Some("blue"));
        assert_eq!(el.attrs.len(), 1);
    }
}
