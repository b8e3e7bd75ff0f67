//! Markup codec — parsing and serialization of the canvas document.
//!
//! Two serialization modes exist and must never be conflated:
//!
//! - **internal** — unit-less numeric size; the form stored, synced, and fed
//!   back through [`parse`]. `parse(serialize_internal(..))` is exact for any
//!   document the codec itself produced.
//! - **export** — fabrication hand-off only: size carries a `mm` suffix plus a
//!   `viewBox` that keeps the coordinate scale at exactly 1 unit = 1 mm. This
//!   form is never ingested back into the authoritative document.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::element::SvgElement;
use crate::error::{CanvasError, Result};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Reserved id for the browser's selection overlay. Never part of the
/// authoritative document.
pub const SELECTION_MARKER_ID: &str = "_sel";

/// Result of parsing a markup document: top-level elements in paint order,
/// plus whatever root size attributes were present and numeric.
#[derive(Debug, Clone, Default)]
pub struct ParsedDocument {
    pub elements: Vec<SvgElement>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

fn parse_err(e: impl std::fmt::Display) -> CanvasError {
    CanvasError::Parse(e.to_string())
}

fn local(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn parse_dim(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn read_root(start: &BytesStart, doc: &mut ParsedDocument) -> Result<()> {
    let tag = local(start.local_name().as_ref());
    if tag != "svg" {
        return Err(CanvasError::Parse(format!(
            "expected <svg> root, found <{tag}>"
        )));
    }
    for attr in start.attributes() {
        let attr = attr.map_err(parse_err)?;
        let key = local(attr.key.local_name().as_ref());
        let value = attr.unescape_value().map_err(parse_err)?;
        match key.as_str() {
            "width" => doc.width = parse_dim(&value),
            "height" => doc.height = parse_dim(&value),
            _ => {}
        }
    }
    Ok(())
}

/// Build an element from a start/empty tag, stripping namespace prefixes from
/// the tag and attribute names. The `id` attribute becomes element identity
/// rather than an ordinary attribute.
fn element_from_start(start: &BytesStart) -> Result<SvgElement> {
    let tag = local(start.local_name().as_ref());
    let mut el = SvgElement::new("", tag);
    for attr in start.attributes() {
        let attr = attr.map_err(parse_err)?;
        if local(attr.key.as_ref()).starts_with("xmlns") {
            continue;
        }
        let key = local(attr.key.local_name().as_ref());
        let value = attr.unescape_value().map_err(parse_err)?.into_owned();
        if key == "id" {
            el.id = value;
        } else {
            el.attrs.insert(key, value);
        }
    }
    Ok(el)
}

/// Collect the text content of an element, dropping any nested markup.
fn read_text_content(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<String> {
    let end_name = start.name().as_ref().to_vec();
    let mut text = String::new();
    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Text(t) => text.push_str(&t.unescape().map_err(parse_err)?),
            Event::Start(child) => {
                let end = child.to_end().into_owned();
                reader.read_to_end(end.name()).map_err(parse_err)?;
            }
            Event::End(e) if e.name().as_ref() == end_name.as_slice() => break,
            Event::Eof => return Err(CanvasError::Parse("unexpected end of markup".to_string())),
            _ => {}
        }
    }
    Ok(text)
}

/// Parse markup text into an ordered element sequence.
///
/// Only direct children of the `<svg>` root become elements; nested structure
/// inside a child is dropped (the document model is flat). Comments,
/// whitespace, and processing instructions are skipped. Unknown tags are kept
/// as opaque passthrough so they survive round-trips. The selection overlay
/// marker is excluded. Malformed markup fails with [`CanvasError::Parse`].
pub fn parse(markup: &str) -> Result<ParsedDocument> {
    let mut reader = Reader::from_str(markup);
    let mut doc = ParsedDocument::default();
    let mut root_open = false;
    let mut root_closed = false;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Eof => break,
            Event::Start(start) if !root_open => {
                read_root(&start, &mut doc)?;
                root_open = true;
            }
            Event::Start(start) => {
                if root_closed {
                    return Err(CanvasError::Parse(
                        "content after document root".to_string(),
                    ));
                }
                let mut el = element_from_start(&start)?;
                if el.tag == "text" {
                    el.text = read_text_content(&mut reader, &start)?;
                } else {
                    let end = start.to_end().into_owned();
                    reader.read_to_end(end.name()).map_err(parse_err)?;
                }
                if el.id != SELECTION_MARKER_ID {
                    doc.elements.push(el);
                }
            }
            // self-closed root: a valid, empty document
            Event::Empty(start) if !root_open => {
                read_root(&start, &mut doc)?;
                root_open = true;
                root_closed = true;
            }
            Event::Empty(start) => {
                if root_closed {
                    return Err(CanvasError::Parse(
                        "content after document root".to_string(),
                    ));
                }
                let el = element_from_start(&start)?;
                if el.id != SELECTION_MARKER_ID {
                    doc.elements.push(el);
                }
            }
            Event::End(end) => {
                if local(end.local_name().as_ref()) == "svg" {
                    root_closed = true;
                }
            }
            Event::Text(t) => {
                let content = t.unescape().map_err(parse_err)?;
                if content.trim().is_empty() {
                    continue;
                }
                if !root_open {
                    return Err(CanvasError::Parse(
                        "text content outside markup root".to_string(),
                    ));
                }
                if root_closed {
                    return Err(CanvasError::Parse(
                        "content after document root".to_string(),
                    ));
                }
            }
            // declarations, comments, CDATA, processing instructions, doctype
            _ => {}
        }
    }

    if !root_open || !root_closed {
        return Err(CanvasError::Parse(
            "markup is not a complete <svg> document".to_string(),
        ));
    }
    Ok(doc)
}

/// Render a numeric dimension without a trailing `.0` for whole values, so
/// serialized sizes match what external markup typically carries.
fn fmt_dim(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn serialize(elements: &[SvgElement], root_attrs: &str) -> String {
    let mut parts = vec![format!("<svg xmlns=\"{SVG_NS}\" {root_attrs}>")];
    for el in elements {
        parts.push(format!("  {}", el.to_markup()));
    }
    parts.push("</svg>".to_string());
    parts.join("\n")
}

/// Internal-mode serialization: unit-less size, the exact inverse of [`parse`].
pub fn serialize_internal(elements: &[SvgElement], width: f64, height: f64) -> String {
    let root = format!(
        "width=\"{}\" height=\"{}\"",
        fmt_dim(width),
        fmt_dim(height)
    );
    serialize(elements, &root)
}

/// Export-mode serialization for downstream fabrication tooling: the size is
/// declared in millimetres and the `viewBox` pins the effective scale factor
/// to 1 (one internal unit renders as one millimetre).
pub fn serialize_export(elements: &[SvgElement], width: f64, height: f64) -> String {
    let (w, h) = (fmt_dim(width), fmt_dim(height));
    let root = format!("width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\"");
    serialize(elements, &root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn sample_elements() -> Vec<SvgElement> {
        let mut circle = SvgElement::new("el-1", "circle");
        circle.set_attr("cx", "10");
        circle.set_attr("cy", "10");
        circle.set_attr("r", "5");
        circle.set_attr("data-layer", "CUT_OUTSIDE");

        let mut label = SvgElement::new("el-2", "text");
        label.set_attr("x", "20");
        label.set_attr("y", "30");
        label.text = "Panel A <rev 2>".to_string();

        vec![circle, label]
    }

    #[test]
    fn test_round_trip_is_exact() {
        let elements = sample_elements();
        let markup = serialize_internal(&elements, 100.0, 60.0);
        let parsed = parse(&markup).unwrap();
        assert_eq!(parsed.elements, elements);
        assert_eq!(parsed.width, Some(100.0));
        assert_eq!(parsed.height, Some(60.0));
    }

    #[test]
    fn test_export_mode_has_units_and_identity_viewbox() {
        let markup = serialize_export(&sample_elements(), 100.0, 60.0);
        assert!(markup.contains("width=\"100mm\""));
        assert!(markup.contains("height=\"60mm\""));
        assert!(markup.contains("viewBox=\"0 0 100 60\""));
    }

    #[test]
    fn test_internal_mode_never_has_units() {
        let markup = serialize_internal(&sample_elements(), 100.0, 60.0);
        assert!(!markup.contains("mm"));
        assert!(!markup.contains("viewBox"));
        assert!(markup.contains("width=\"100\""));
    }

    #[test]
    fn test_parse_skips_comments_and_whitespace() {
        let markup = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"50\" height=\"50\">\n\
                      <!-- a comment -->\n\
                      <rect id=\"el-1\" x=\"1\"/>\n\
                      </svg>";
        let parsed = parse(markup).unwrap();
        assert_eq!(parsed.elements.len(), 1);
        assert_eq!(parsed.elements[0].tag, "rect");
    }

    #[test]
    fn test_parse_excludes_selection_marker() {
        let markup = r#"<svg width="50" height="50"><rect id="_sel" x="0"/><rect id="el-1" x="1"/></svg>"#;
        let parsed = parse(markup).unwrap();
        assert_eq!(parsed.elements.len(), 1);
        assert_eq!(parsed.elements[0].id, "el-1");
    }

    #[test]
    fn test_parse_keeps_unknown_tags_as_passthrough() {
        let markup = r#"<svg width="50" height="50"><widget id="el-1" foo="bar"/></svg>"#;
        let parsed = parse(markup).unwrap();
        assert_eq!(parsed.elements[0].tag, "widget");
        assert_eq!(parsed.elements[0].attr("foo"), Some("bar"));
    }

    #[test]
    fn test_parse_strips_namespace_prefixes() {
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="10" height="10"><rect id="el-1" xlink:href="#x" x="1"/></svg>"##;
        let parsed = parse(markup).unwrap();
        assert_eq!(parsed.elements[0].attr("href"), Some("#x"));
        assert!(parsed.elements[0].attr("xmlns").is_none());
    }

    #[test]
    fn test_parse_captures_text_content() {
        let markup = r#"<svg width="10" height="10"><text id="el-1" x="2">Hi &amp; bye</text></svg>"#;
        let parsed = parse(markup).unwrap();
        assert_eq!(parsed.elements[0].text, "Hi & bye");
    }

    #[test]
    fn test_parse_drops_nested_structure() {
        let markup = r#"<svg width="10" height="10"><g id="el-1"><rect id="el-2" x="1"/></g><rect id="el-3" x="2"/></svg>"#;
        let parsed = parse(markup).unwrap();
        let tags: Vec<&str> = parsed.elements.iter().map(|el| el.tag.as_str()).collect();
        assert_eq!(tags, vec!["g", "rect"]);
        assert_eq!(parsed.elements[1].id, "el-3");
    }

    #[test]
    fn test_parse_rejects_malformed_markup() {
        assert!(matches!(parse("<not-xml"), Err(CanvasError::Parse(_))));
        assert!(matches!(parse("plain text"), Err(CanvasError::Parse(_))));
        assert!(matches!(
            parse("<svg width=\"10\" height=\"10\"><rect id=\"el-1\""),
            Err(CanvasError::Parse(_))
        ));
    }

    #[test]
    fn test_self_closed_root_is_an_empty_document() {
        let parsed = parse(r#"<svg width="30" height="20"/>"#).unwrap();
        assert!(parsed.elements.is_empty());
        assert_eq!(parsed.width, Some(30.0));
        assert_eq!(parsed.height, Some(20.0));
    }

    #[test]
    fn test_parse_rejects_content_after_root() {
        assert!(matches!(
            parse(r#"<svg width="10" height="10"/>junk"#),
            Err(CanvasError::Parse(_))
        ));
        assert!(matches!(
            parse("<svg width=\"10\" height=\"10\"></svg><rect id=\"el-1\"/>"),
            Err(CanvasError::Parse(_))
        ));
        // trailing whitespace is fine
        assert!(parse("<svg width=\"10\" height=\"10\"></svg>\n").is_ok());
    }

    #[test]
    fn test_parse_rejects_non_svg_root() {
        assert!(matches!(
            parse("<html><body/></html>"),
            Err(CanvasError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_tolerates_missing_or_non_numeric_size() {
        let parsed = parse(r#"<svg><rect id="el-1"/></svg>"#).unwrap();
        assert_eq!(parsed.width, None);
        assert_eq!(parsed.height, None);

        let parsed = parse(r#"<svg width="banana" height="40"><rect id="el-1"/></svg>"#).unwrap();
        assert_eq!(parsed.width, None);
        assert_eq!(parsed.height, Some(40.0));
    }

    #[test]
    fn test_fractional_sizes_round_trip() {
        let elements: Vec<SvgElement> = Vec::new();
        let markup = serialize_internal(&elements, 105.5, 60.25);
        let parsed = parse(&markup).unwrap();
        assert_eq!(parsed.width, Some(105.5));
        assert_eq!(parsed.height, Some(60.25));
    }

    #[test]
    fn test_mutation_api_document_round_trips() {
        use crate::canvas::CanvasDocument;

        let mut doc = CanvasDocument::new(100.0, 100.0);
        let mut attrs = IndexMap::new();
        attrs.insert("cx".to_string(), "10".to_string());
        attrs.insert("cy".to_string(), "10".to_string());
        attrs.insert("r".to_string(), "5".to_string());
        doc.add("circle", attrs, "").unwrap();
        let mut attrs = IndexMap::new();
        attrs.insert("x".to_string(), "4".to_string());
        doc.add("text", attrs, "hello").unwrap();

        let parsed = parse(&doc.serialize()).unwrap();
        assert_eq!(parsed.elements, doc.list());
        assert_eq!(parsed.width, Some(100.0));
        assert_eq!(parsed.height, Some(100.0));
    }
}
