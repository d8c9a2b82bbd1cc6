//! Response body classification.
//!
//! A body is classified once, up front, into a [`Payload`]. Extraction code
//! then matches on the shape instead of guessing at it.

use serde_json::{Map, Value};
use xml::reader::{EventReader, XmlEvent};

use crate::PayloadError;

// ─────────────────────────────────────────────────────────────────────────────
// Minimal XML tree
// ─────────────────────────────────────────────────────────────────────────────

/// An XML element reduced to what the rate sources need.
///
/// `name` is the local name, without namespace prefix. `text` is the
/// concatenation of the element's own character data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive local name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Walks this element and all descendants in document order.
    pub fn iter(&self) -> impl Iterator<Item = &XmlElement> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children.iter().rev());
            Some(next)
        })
    }
}

/// Parses a document into an [`XmlElement`] tree rooted at its root element.
pub fn parse_xml(bytes: &[u8]) -> Result<XmlElement, PayloadError> {
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    for event in EventReader::new(bytes) {
        match event.map_err(|e| PayloadError::InvalidXml(e.to_string()))? {
            XmlEvent::StartElement { name, .. } => stack.push(XmlElement::new(name.local_name)),
            XmlEvent::EndElement { .. } => {
                let element = stack
                    .pop()
                    .ok_or_else(|| PayloadError::InvalidXml("unbalanced end tag".into()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| PayloadError::InvalidXml("document has no root element".into()))
}

fn looks_like_markup(text: &str) -> bool {
    text.starts_with('<') && text.ends_with('>')
}

// ─────────────────────────────────────────────────────────────────────────────
// Payload
// ─────────────────────────────────────────────────────────────────────────────

/// The shape a response body arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Blank body.
    Empty,
    JsonArray(Vec<Value>),
    JsonObject(Map<String, Value>),
    /// Any other JSON value (number, bool, null, or a non-XML string).
    JsonScalar(Value),
    XmlDocument(XmlElement),
    /// A document serialized as text inside another one: the legacy BCCR
    /// `<string>` wrapper, or a JSON string holding XML (`outer` is `None`).
    EncodedXml {
        outer: Option<XmlElement>,
        inner: XmlElement,
    },
    /// Not JSON, not XML.
    Text(String),
}

impl Payload {
    /// Classifies a raw body without assuming which endpoint produced it.
    pub fn classify(bytes: &[u8]) -> Payload {
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim_start_matches('\u{feff}').trim();

        if trimmed.is_empty() {
            return Payload::Empty;
        }

        if trimmed.starts_with('<') {
            return match parse_xml(trimmed.as_bytes()) {
                Ok(root) => Self::unwrap_xml(root),
                Err(_) => Payload::Text(trimmed.to_string()),
            };
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(rows)) => Payload::JsonArray(rows),
            Ok(Value::Object(object)) => Payload::JsonObject(object),
            Ok(Value::String(inner)) if looks_like_markup(inner.trim()) => {
                match parse_xml(inner.trim().as_bytes()) {
                    Ok(inner) => Payload::EncodedXml { outer: None, inner },
                    Err(_) => Payload::JsonScalar(Value::String(inner)),
                }
            }
            Ok(other) => Payload::JsonScalar(other),
            Err(_) => Payload::Text(trimmed.to_string()),
        }
    }

    /// Re-parses the root's text as XML when it looks like a nested document.
    /// A nested document that fails to parse leaves the outer one in place.
    fn unwrap_xml(outer: XmlElement) -> Payload {
        let nested = outer.text.trim();
        if !looks_like_markup(nested) {
            return Payload::XmlDocument(outer);
        }
        match parse_xml(nested.as_bytes()) {
            Ok(inner) => Payload::EncodedXml {
                outer: Some(outer),
                inner,
            },
            Err(_) => Payload::XmlDocument(outer),
        }
    }

    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Empty => "empty body",
            Payload::JsonArray(_) => "JSON array",
            Payload::JsonObject(_) => "JSON object",
            Payload::JsonScalar(_) => "JSON value",
            Payload::XmlDocument(_) => "XML document",
            Payload::EncodedXml { .. } => "encoded XML document",
            Payload::Text(_) => "plain text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_xml_drops_namespace_prefix() {
        let root = parse_xml(
            br#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><NUM_VALOR>1</NUM_VALOR></soap:Body></soap:Envelope>"#,
        )
        .unwrap();
        assert_eq!(root.name, "Envelope");
        let names: Vec<&str> = root.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Envelope", "Body", "NUM_VALOR"]);
    }

    #[test]
    fn test_iter_is_document_order() {
        let root = parse_xml(b"<a><b><c/></b><d/></a>").unwrap();
        let names: Vec<&str> = root.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parse_xml_rejects_garbage() {
        assert!(parse_xml(b"<a><b></a>").is_err());
        assert!(parse_xml(b"").is_err());
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(Payload::classify(b""), Payload::Empty);
        assert_eq!(Payload::classify(b"  \n"), Payload::Empty);
    }

    #[test]
    fn test_classify_json_shapes() {
        assert!(matches!(
            Payload::classify(br#"[{"NumValor": "1"}]"#),
            Payload::JsonArray(rows) if rows.len() == 1
        ));
        assert!(matches!(
            Payload::classify(br#"{"colones": 650.5}"#),
            Payload::JsonObject(_)
        ));
        assert!(matches!(
            Payload::classify(b"42"),
            Payload::JsonScalar(Value::Number(_))
        ));
    }

    #[test]
    fn test_classify_xml_document() {
        let payload = Payload::classify(b"<Data><NUM_VALOR>1</NUM_VALOR></Data>");
        assert!(matches!(payload, Payload::XmlDocument(root) if root.name == "Data"));
    }

    #[test]
    fn test_classify_escaped_xml_in_string_element() {
        let body = br#"<?xml version="1.0" encoding="utf-8"?>
<string xmlns="http://ws.sdde.bccr.fi.cr">&lt;Data&gt;&lt;NUM_VALOR&gt;500.00&lt;/NUM_VALOR&gt;&lt;/Data&gt;</string>"#;
        match Payload::classify(body) {
            Payload::EncodedXml { outer, inner } => {
                assert_eq!(outer.unwrap().name, "string");
                assert_eq!(inner.name, "Data");
            }
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_classify_cdata_xml_in_string_element() {
        let body = b"<string><![CDATA[<Data><NUM_VALOR>1</NUM_VALOR></Data>]]></string>";
        assert!(matches!(
            Payload::classify(body),
            Payload::EncodedXml { inner, .. } if inner.name == "Data"
        ));
    }

    #[test]
    fn test_broken_inner_document_keeps_outer() {
        let body = b"<string>&lt;Data&gt;&lt;oops&gt;</string>";
        assert!(matches!(
            Payload::classify(body),
            Payload::XmlDocument(root) if root.name == "string"
        ));
    }

    #[test]
    fn test_classify_xml_inside_json_string() {
        let body = br#""<Data><NUM_VALOR>7</NUM_VALOR></Data>""#;
        assert!(matches!(
            Payload::classify(body),
            Payload::EncodedXml { outer: None, inner } if inner.name == "Data"
        ));
    }

    #[test]
    fn test_classify_text() {
        assert_eq!(
            Payload::classify(b"Service Unavailable"),
            Payload::Text("Service Unavailable".into())
        );
        assert_eq!(
            Payload::classify(b"<html><body>broken"),
            Payload::Text("<html><body>broken".into())
        );
    }
}
