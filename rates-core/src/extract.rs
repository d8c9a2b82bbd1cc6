//! Rate extraction from classified payloads.

use serde_json::{Map, Value};

use crate::number::{normalize_number, positive_rate, rate_from_json};
use crate::{HaciendaField, Payload, PayloadError, XmlElement};

/// Field holding the value in BCCR REST rows.
pub const INDICATOR_JSON_FIELD: &str = "NumValor";

/// Element holding the value in BCCR legacy XML.
pub const INDICATOR_XML_ELEMENT: &str = "NUM_VALOR";

// ─────────────────────────────────────────────────────────────────────────────
// BCCR indicator series
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the last valid indicator value in the payload, in the order the
/// service listed it.
///
/// Rows are not sorted by date first: each valid entry overwrites the previous
/// one, so "latest" means "last listed". Blank, zero and negative values are
/// skipped. `Ok(None)` means the body had a known shape but no value.
pub fn latest_indicator_value(payload: &Payload) -> Result<Option<f64>, PayloadError> {
    match payload {
        Payload::JsonArray(rows) => latest_from_rows(rows),
        Payload::XmlDocument(root) => latest_from_xml(root),
        Payload::EncodedXml { inner, .. } => latest_from_xml(inner),
        Payload::Empty | Payload::JsonObject(_) => Ok(None),
        other => Err(PayloadError::UnexpectedShape {
            expected: "indicator rows",
            found: other.kind(),
        }),
    }
}

fn latest_from_rows(rows: &[Value]) -> Result<Option<f64>, PayloadError> {
    let mut latest = None;
    for row in rows {
        let Some(object) = row.as_object() else {
            continue;
        };
        let Some(value) = field_ignore_case(object, INDICATOR_JSON_FIELD) else {
            continue;
        };
        if let Some(rate) = rate_from_json(value)?.and_then(positive_rate) {
            latest = Some(rate);
        }
    }
    Ok(latest)
}

fn latest_from_xml(root: &XmlElement) -> Result<Option<f64>, PayloadError> {
    let mut latest = None;
    for element in root.iter().filter(|e| e.is_named(INDICATOR_XML_ELEMENT)) {
        let text = element.text.trim();
        if text.is_empty() {
            continue;
        }
        if let Some(rate) = positive_rate(normalize_number(text)?) {
            latest = Some(rate);
        }
    }
    Ok(latest)
}

fn field_ignore_case<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

// ─────────────────────────────────────────────────────────────────────────────
// Hacienda
// ─────────────────────────────────────────────────────────────────────────────

/// Reads the rate from a Hacienda JSON object at the field's path.
pub fn hacienda_rate(payload: &Payload, field: HaciendaField) -> Result<f64, PayloadError> {
    let Payload::JsonObject(object) = payload else {
        return Err(PayloadError::UnexpectedShape {
            expected: "JSON object",
            found: payload.kind(),
        });
    };

    let (first, rest) = field
        .path()
        .split_first()
        .ok_or_else(|| PayloadError::MissingField(field.to_string()))?;
    let mut value = object.get(*first);
    for segment in rest {
        value = value.and_then(|v| v.get(*segment));
    }

    let rate = match value {
        Some(value) => rate_from_json(value)?,
        None => None,
    };
    rate.and_then(positive_rate)
        .ok_or_else(|| PayloadError::MissingField(field.to_string()))
}
