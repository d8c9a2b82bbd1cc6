//! Diagnostic message extraction and authentication error detection.

use serde_json::Value;

use crate::{Payload, XmlElement};

/// Message reported for a body that is an empty JSON array.
pub const EMPTY_RESPONSE: &str = "empty response";

const MESSAGE_KEYS: &[&str] = &["message", "mensaje", "error", "detail", "detalle"];
const MESSAGE_ELEMENTS: &[&str] = &["MENSAJE", "MESSAGE", "ERROR", "DETAIL"];

const AUTH_HINTS: &[&str] = &[
    "subscription",
    "suscripción",
    "suscripcion",
    "authentic",
    "autentic",
    "invalid",
    "inválid",
];

/// Pulls a human-readable diagnostic out of a response body.
pub fn extract_message(bytes: &[u8]) -> Option<String> {
    message_from_payload(&Payload::classify(bytes))
}

/// Same as [`extract_message`] for an already classified body.
pub fn message_from_payload(payload: &Payload) -> Option<String> {
    match payload {
        Payload::Empty => None,
        Payload::JsonObject(object) => {
            let keyed = MESSAGE_KEYS.iter().find_map(|wanted| {
                object
                    .iter()
                    .filter(|(key, _)| key.eq_ignore_ascii_case(wanted))
                    .find_map(|(_, value)| json_text(value))
            });
            keyed.or_else(|| (!object.is_empty()).then(|| Value::Object(object.clone()).to_string()))
        }
        Payload::JsonArray(rows) if rows.is_empty() => Some(EMPTY_RESPONSE.to_string()),
        Payload::JsonArray(_) => None,
        Payload::JsonScalar(value) => json_text(value),
        Payload::XmlDocument(root) => xml_message(root),
        Payload::EncodedXml { outer, inner } => {
            xml_message(inner).or_else(|| outer.as_ref().and_then(xml_message))
        }
        Payload::Text(text) => non_empty(text),
    }
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) => non_empty(text),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(object) if object.is_empty() => None,
        other => Some(other.to_string()),
    }
}

fn xml_message(root: &XmlElement) -> Option<String> {
    root.iter()
        .filter(|e| MESSAGE_ELEMENTS.iter().any(|name| e.is_named(name)))
        .find_map(|e| non_empty(&e.text))
        .or_else(|| non_empty(&root.text))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// True when a diagnostic blames the credential rather than the request.
///
/// Requires a mention of the token plus a subscription, authentication or
/// validity complaint, in English or Spanish.
pub fn is_auth_error(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("token") && AUTH_HINTS.iter().any(|hint| lower.contains(hint))
}
