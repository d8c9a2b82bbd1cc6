//! BCCR subscription credentials.

use std::collections::BTreeMap;
use std::fmt;

use rates_core::CurrencyCode;
use serde::{Deserialize, Serialize};

/// Name sent as `Nombre` when none is configured.
pub const DEFAULT_DISPLAY_NAME: &str = "Odoo";

/// Credentials and series codes for the BCCR indicator service.
///
/// Owned by the host and passed in per call; the fetcher never stores them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCredentials {
    pub email: String,
    #[serde(skip_serializing, default)]
    pub token: Option<String>,
    pub display_name: String,
    /// Indicator code per currency (USD sale = 318, EUR sale = 333).
    pub indicators: BTreeMap<CurrencyCode, String>,
}

impl ProviderCredentials {
    pub fn new(email: impl Into<String>, token: Option<String>) -> Self {
        Self {
            email: email.into(),
            token,
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_indicator(mut self, currency: CurrencyCode, indicator: impl Into<String>) -> Self {
        self.indicators.insert(currency, indicator.into());
        self
    }

    /// The token, if set and not blank.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    /// The configured indicator code for a currency, if not blank.
    pub fn indicator(&self, currency: CurrencyCode) -> Option<&str> {
        self.indicators
            .get(&currency)
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
    }

    /// Display name, falling back to the default when blank.
    pub fn display_name(&self) -> &str {
        match self.display_name.trim() {
            "" => DEFAULT_DISPLAY_NAME,
            name => name,
        }
    }
}

impl Default for ProviderCredentials {
    fn default() -> Self {
        Self {
            email: String::new(),
            token: None,
            display_name: DEFAULT_DISPLAY_NAME.to_string(),
            indicators: CurrencyCode::all()
                .iter()
                .map(|c| (*c, c.default_bccr_indicator().to_string()))
                .collect(),
        }
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("email", &self.email)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("display_name", &self.display_name)
            .field("indicators", &self.indicators)
            .finish()
    }
}
