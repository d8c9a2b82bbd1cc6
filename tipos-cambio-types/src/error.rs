//! Error types for the exchange rate fetcher.

use rates_core::PayloadError;

/// Coarse classification of a [`FetchError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Network,
    HttpStatus,
    Parse,
    NoData,
    Authentication,
}

/// Everything that can go wrong while resolving a rate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Missing token, email or indicator, or nothing to try.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout, DNS failure, refused connection.
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {detail}")]
    HttpStatus { status: u16, detail: String },

    /// The body matched no known shape, or held an unreadable number.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// The body was understood but carried no value for the period.
    #[error("No data: {0}")]
    NoData(String),

    /// The service rejected the credential. Retrying other endpoints or date
    /// formats will not help.
    #[error("Authentication rejected: {detail}{}", diagnostics_suffix(.diagnostics))]
    Authentication {
        status: Option<u16>,
        detail: String,
        diagnostics: Option<String>,
    },
}

fn diagnostics_suffix(diagnostics: &Option<String>) -> String {
    diagnostics
        .as_deref()
        .map(|d| format!(" (token diagnostics: {})", d))
        .unwrap_or_default()
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Configuration(_) => ErrorKind::Configuration,
            FetchError::Network(_) => ErrorKind::Network,
            FetchError::HttpStatus { .. } => ErrorKind::HttpStatus,
            FetchError::Parse(_) => ErrorKind::Parse,
            FetchError::NoData(_) => ErrorKind::NoData,
            FetchError::Authentication { .. } => ErrorKind::Authentication,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }

    /// HTTP status attached to the error, if a response arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            FetchError::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// The provider's diagnostic or our own description, without the prefix.
    pub fn detail(&self) -> &str {
        match self {
            FetchError::Configuration(detail)
            | FetchError::Network(detail)
            | FetchError::Parse(detail)
            | FetchError::NoData(detail)
            | FetchError::HttpStatus { detail, .. }
            | FetchError::Authentication { detail, .. } => detail,
        }
    }

    /// Token diagnostics attached to an authentication failure.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            FetchError::Authentication { diagnostics, .. } => diagnostics.as_deref(),
            _ => None,
        }
    }

    /// Attaches token diagnostics to an authentication failure. Other kinds
    /// are returned unchanged.
    pub fn with_token_diagnostics(self, warnings: &[String]) -> Self {
        match self {
            FetchError::Authentication { status, detail, .. } if !warnings.is_empty() => {
                FetchError::Authentication {
                    status,
                    detail,
                    diagnostics: Some(warnings.join("; ")),
                }
            }
            other => other,
        }
    }
}

impl From<PayloadError> for FetchError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::MissingField(_) => FetchError::NoData(err.to_string()),
            other => FetchError::Parse(other.to_string()),
        }
    }
}
