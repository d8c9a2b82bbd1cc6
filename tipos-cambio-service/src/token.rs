//! Local inspection of the BCCR bearer token.
//!
//! The token's payload segment is decoded without checking the signature.
//! This only produces hints for an operator staring at an authentication
//! failure; it is never used to accept or reject a credential.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Returns human-readable warnings about a JWT-shaped token.
///
/// Checks that the embedded email matches the configured one, that the token
/// is already valid (`nbf`), and that its audience is the expected one.
/// Tokens that do not decode as a JWT produce no warnings.
pub fn inspect_token(
    token: &str,
    configured_email: &str,
    expected_audience: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    let Some(claims) = decode_claims(token) else {
        return Vec::new();
    };
    let mut warnings = Vec::new();

    let token_email = ["email", "sub"]
        .iter()
        .filter_map(|key| claims.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_lowercase);
    let email = configured_email.trim().to_lowercase();
    if let Some(token_email) = token_email {
        if !email.is_empty() && token_email != email {
            warnings.push(format!(
                "token email ({}) differs from configured email ({})",
                token_email, email
            ));
        }
    }

    let valid_from = claims
        .get("nbf")
        .and_then(Value::as_f64)
        .and_then(|nbf| DateTime::<Utc>::from_timestamp(nbf as i64, 0));
    if let Some(valid_from) = valid_from {
        if valid_from > now {
            warnings.push(format!(
                "token not valid yet (nbf={})",
                valid_from.to_rfc3339()
            ));
        }
    }

    match claims.get("aud") {
        Some(Value::String(aud)) if !aud.is_empty() && aud != expected_audience => {
            warnings.push(format!("unexpected token audience: {}", aud));
        }
        Some(Value::Array(auds))
            if !auds.is_empty() && !auds.iter().any(|a| a.as_str() == Some(expected_audience)) =>
        {
            warnings.push(format!("unexpected token audience: {}", Value::Array(auds.clone())));
        }
        _ => {}
    }

    warnings
}

fn decode_claims(token: &str) -> Option<Map<String, Value>> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return None;
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(claims) => Some(claims),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jwt(claims: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(claims)
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
    }

    const AUD: &str = "SDDE-SitioExterno";

    #[test]
    fn test_clean_token_has_no_warnings() {
        let token = jwt(r#"{"email":"Ana@Empresa.cr","nbf":1700000000,"aud":"SDDE-SitioExterno"}"#);
        assert!(inspect_token(&token, " ana@empresa.cr ", AUD, now()).is_empty());
    }

    #[test]
    fn test_email_mismatch() {
        let token = jwt(r#"{"email":"otro@empresa.cr"}"#);
        let warnings = inspect_token(&token, "ana@empresa.cr", AUD, now());
        assert_eq!(
            warnings,
            vec!["token email (otro@empresa.cr) differs from configured email (ana@empresa.cr)"]
        );
    }

    #[test]
    fn test_sub_is_used_when_email_is_blank() {
        let token = jwt(r#"{"email":"","sub":"otro@empresa.cr"}"#);
        assert_eq!(inspect_token(&token, "ana@empresa.cr", AUD, now()).len(), 1);
    }

    #[test]
    fn test_not_valid_yet() {
        // 2030-01-01T00:00:00Z
        let token = jwt(r#"{"nbf":1893456000}"#);
        let warnings = inspect_token(&token, "", AUD, now());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("token not valid yet (nbf=2030-01-01T00:00:00"));
    }

    #[test]
    fn test_unexpected_audience() {
        let token = jwt(r#"{"aud":"SDDE-Interno"}"#);
        assert_eq!(
            inspect_token(&token, "", AUD, now()),
            vec!["unexpected token audience: SDDE-Interno"]
        );

        let token = jwt(r#"{"aud":["SDDE-Interno","SDDE-SitioExterno"]}"#);
        assert!(inspect_token(&token, "", AUD, now()).is_empty());
    }

    #[test]
    fn test_padded_payload_segment() {
        let token = format!("h.{}==.s", URL_SAFE_NO_PAD.encode(r#"{"aud":"x"}"#));
        assert_eq!(inspect_token(&token, "", AUD, now()).len(), 1);
    }

    #[test]
    fn test_opaque_tokens_are_ignored() {
        assert!(inspect_token("0A1B2C3D", "ana@empresa.cr", AUD, now()).is_empty());
        assert!(inspect_token("a.b", "", AUD, now()).is_empty());
        assert!(inspect_token("a.!!!.c", "", AUD, now()).is_empty());
        let not_object = format!("a.{}.c", URL_SAFE_NO_PAD.encode("[1,2]"));
        assert!(inspect_token(&not_object, "", AUD, now()).is_empty());
    }
}
