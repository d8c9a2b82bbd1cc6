//! Configuration loading from environment.

use std::env;

use tipos_cambio_types::{CurrencyCode, DEFAULT_LOOKBACK_DAYS, ProviderCredentials};

/// Configuration that is missing or unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// BCCR settings read from the environment.
#[derive(Debug, Clone)]
pub struct BccrSettings {
    pub email: Option<String>,
    pub token: Option<String>,
    pub display_name: Option<String>,
    /// `BCCR_INDICADOR`, the series checked by the `bccr` command.
    pub indicator: String,
    pub lookback_days: u32,
    pub usd_indicator: Option<String>,
    pub eur_indicator: Option<String>,
}

impl BccrSettings {
    /// Loads settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads settings through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let lookback_days = match var("BCCR_LOOKBACK_DAYS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "BCCR_LOOKBACK_DAYS",
                value: raw,
            })?,
            None => DEFAULT_LOOKBACK_DAYS,
        };

        Ok(Self {
            email: var("BCCR_EMAIL"),
            token: var("BCCR_TOKEN"),
            display_name: var("BCCR_NOMBRE"),
            indicator: var("BCCR_INDICADOR")
                .unwrap_or_else(|| CurrencyCode::USD.default_bccr_indicator().to_string()),
            lookback_days,
            usd_indicator: var("BCCR_USD_INDICATOR"),
            eur_indicator: var("BCCR_EUR_INDICATOR"),
        })
    }

    /// Credentials for the `bccr` command, which needs both email and token.
    pub fn require_credentials(&self) -> Result<ProviderCredentials, ConfigError> {
        if self.email.is_none() {
            return Err(ConfigError::Missing("BCCR_EMAIL"));
        }
        if self.token.is_none() {
            return Err(ConfigError::Missing("BCCR_TOKEN"));
        }
        Ok(self.credentials())
    }

    /// Credentials as configured; BCCR stays unusable until email and token are set.
    pub fn credentials(&self) -> ProviderCredentials {
        let mut credentials =
            ProviderCredentials::new(self.email.clone().unwrap_or_default(), self.token.clone());
        if let Some(name) = &self.display_name {
            credentials = credentials.with_display_name(name);
        }
        if let Some(code) = &self.usd_indicator {
            credentials = credentials.with_indicator(CurrencyCode::USD, code);
        }
        if let Some(code) = &self.eur_indicator {
            credentials = credentials.with_indicator(CurrencyCode::EUR, code);
        }
        credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<BccrSettings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BccrSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.indicator, "318");
        assert_eq!(settings.lookback_days, 30);
        assert_eq!(settings.credentials().display_name(), "Odoo");
    }

    #[test]
    fn test_missing_credentials() {
        let only_email = settings(&[("BCCR_EMAIL", "ana@empresa.cr")]).unwrap();
        assert!(matches!(
            only_email.require_credentials(),
            Err(ConfigError::Missing("BCCR_TOKEN"))
        ));

        let blank_email = settings(&[("BCCR_EMAIL", "  "), ("BCCR_TOKEN", "t")]).unwrap();
        assert!(matches!(
            blank_email.require_credentials(),
            Err(ConfigError::Missing("BCCR_EMAIL"))
        ));
    }

    #[test]
    fn test_invalid_lookback() {
        assert!(matches!(
            settings(&[("BCCR_LOOKBACK_DAYS", "treinta")]),
            Err(ConfigError::Invalid { var: "BCCR_LOOKBACK_DAYS", .. })
        ));
    }

    #[test]
    fn test_indicator_overrides() {
        let settings = settings(&[
            ("BCCR_EMAIL", "ana@empresa.cr"),
            ("BCCR_TOKEN", "t"),
            ("BCCR_NOMBRE", "Contabilidad"),
            ("BCCR_EUR_INDICATOR", "334"),
        ])
        .unwrap();

        let credentials = settings.require_credentials().unwrap();
        assert_eq!(credentials.display_name(), "Contabilidad");
        assert_eq!(credentials.indicator(CurrencyCode::USD), Some("318"));
        assert_eq!(credentials.indicator(CurrencyCode::EUR), Some("334"));
    }
}
