//! Payload-level errors.

/// Errors raised while reading a value out of a response body.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayloadError {
    #[error("Invalid numeric value: {0:?}")]
    InvalidNumber(String),

    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    #[error("Unexpected response: expected {expected}, got {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Response has no usable \"{0}\" value")]
    MissingField(String),
}
