//! Currency catalogue and response parsing for Costa Rican exchange rate sources.
//!
//! This crate does no IO. It knows which currencies the Central Bank (BCCR) and
//! the Ministry of Finance (Hacienda) publish, how to recognise the shape of a
//! response body, and how to pull a rate or a diagnostic message out of it.
//!
//! # Response shapes
//! Both services have changed formats over time, so a body is classified
//! before anything is extracted from it (see [`Payload::classify`]):
//! - JSON array of indicator rows (`[{"NumValor": "512,34"}, ...]`)
//! - JSON object (Hacienda, or an error document)
//! - XML with `NUM_VALOR` elements
//! - XML serialized as the text of an outer `<string>` element
//!
//! # Example
//! ```
//! use rates_core::{Payload, latest_indicator_value, normalize_number};
//!
//! let body = br#"[{"NumValor": "10"}, {"NumValor": "512,34"}, {"NumValor": ""}]"#;
//! let payload = Payload::classify(body);
//! assert_eq!(latest_indicator_value(&payload).unwrap(), Some(512.34));
//!
//! assert_eq!(normalize_number("1,234.56").unwrap(), 1234.56);
//! ```

mod currency;
mod error;
mod extract;
mod message;
mod number;
mod payload;

pub use currency::{CurrencyCode, HaciendaField};
pub use error::PayloadError;
pub use extract::{
    INDICATOR_JSON_FIELD, INDICATOR_XML_ELEMENT, hacienda_rate, latest_indicator_value,
};
pub use message::{EMPTY_RESPONSE, extract_message, is_auth_error, message_from_payload};
pub use number::{normalize_number, positive_rate, rate_from_json};
pub use payload::{Payload, XmlElement, parse_xml};
