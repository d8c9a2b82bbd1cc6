//! Locale-tolerant number parsing.

use serde_json::Value;

use crate::PayloadError;

/// Parses a rate written with either a comma or a period as decimal mark.
///
/// All whitespace is removed first. When both `,` and `.` appear the comma is
/// a thousands separator; a lone `,` is the decimal mark.
pub fn normalize_number(raw: &str) -> Result<f64, PayloadError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized = if compact.contains(',') && compact.contains('.') {
        compact.replace(',', "")
    } else {
        compact.replace(',', ".")
    };

    normalized
        .parse::<f64>()
        .map_err(|_| PayloadError::InvalidNumber(raw.trim().to_string()))
}

/// Keeps only values usable as a rate: finite and strictly positive.
pub fn positive_rate(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Reads a JSON value that may hold a number or a numeric string.
///
/// `null` and blank strings are absent values, not errors.
pub fn rate_from_json(value: &Value) -> Result<Option<f64>, PayloadError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => Ok(number.as_f64()),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => normalize_number(text).map(Some),
        other => Err(PayloadError::InvalidNumber(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comma_as_decimal_mark() {
        assert_eq!(normalize_number("534,12").unwrap(), 534.12);
    }

    #[test]
    fn test_comma_as_thousands_separator() {
        assert_eq!(normalize_number("1,234.56").unwrap(), 1234.56);
    }

    #[test]
    fn test_plain_number() {
        assert_eq!(normalize_number("1234.56").unwrap(), 1234.56);
        assert_eq!(normalize_number("  512 ").unwrap(), 512.0);
    }

    #[test]
    fn test_inner_whitespace_is_removed() {
        assert_eq!(normalize_number("1 234,5").unwrap(), 1234.5);
    }

    #[test]
    fn test_mixed_separators_drop_every_comma() {
        // Both marks present: commas are always thousands separators.
        assert_eq!(normalize_number("1.234,56").unwrap(), 1.23456);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert_eq!(
            normalize_number("n/a"),
            Err(PayloadError::InvalidNumber("n/a".into()))
        );
        assert!(normalize_number("").is_err());
        assert!(normalize_number("1,234,567").is_err());
    }

    #[test]
    fn test_positive_rate() {
        assert_eq!(positive_rate(512.3), Some(512.3));
        assert_eq!(positive_rate(0.0), None);
        assert_eq!(positive_rate(-1.0), None);
        assert_eq!(positive_rate(f64::NAN), None);
        assert_eq!(positive_rate(f64::INFINITY), None);
    }

    #[test]
    fn test_rate_from_json() {
        assert_eq!(rate_from_json(&json!(650.5)).unwrap(), Some(650.5));
        assert_eq!(rate_from_json(&json!("650,5")).unwrap(), Some(650.5));
        assert_eq!(rate_from_json(&json!(null)).unwrap(), None);
        assert_eq!(rate_from_json(&json!("  ")).unwrap(), None);
        assert!(rate_from_json(&json!({"valor": 1})).is_err());
    }
}
