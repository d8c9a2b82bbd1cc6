//! Fetcher configuration supplied by the host at call time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{FetchStrategy, ProviderCredentials};

/// Base URL of the Hacienda exchange rate endpoints.
pub const HACIENDA_BASE_URL: &str = "https://api.hacienda.go.cr/indicadores/tc";

/// Audience BCCR puts in tokens issued for external subscribers.
pub const BCCR_TOKEN_AUDIENCE: &str = "SDDE-SitioExterno";

/// Which providers are asked, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderPolicy {
    /// Hacienda first; BCCR as fallback when a token is configured.
    #[default]
    HaciendaWithBccrFallback,
    BccrOnly,
    HaciendaOnly,
}

impl fmt::Display for ProviderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderPolicy::HaciendaWithBccrFallback => write!(f, "hacienda-with-bccr-fallback"),
            ProviderPolicy::BccrOnly => write!(f, "bccr-only"),
            ProviderPolicy::HaciendaOnly => write!(f, "hacienda-only"),
        }
    }
}

impl FromStr for ProviderPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hacienda-with-bccr-fallback" | "hacienda-first" | "auto" => {
                Ok(ProviderPolicy::HaciendaWithBccrFallback)
            }
            "bccr-only" | "bccr" => Ok(ProviderPolicy::BccrOnly),
            "hacienda-only" | "hacienda" => Ok(ProviderPolicy::HaciendaOnly),
            _ => Err(format!(
                "Unknown provider policy: {}. Supported: hacienda-first, bccr, hacienda",
                s
            )),
        }
    }
}

/// Everything the fetcher needs besides the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetcherConfig {
    pub credentials: ProviderCredentials,
    pub policy: ProviderPolicy,
    /// Lenient mode: a currency that cannot be resolved is logged and left out
    /// instead of failing the whole batch.
    pub skip_failed_currencies: bool,
    /// BCCR endpoint/date-format combinations, tried in order.
    pub strategies: Vec<FetchStrategy>,
    pub hacienda_base_url: String,
    /// Audience expected in the BCCR token, checked only for diagnostics.
    pub token_audience: String,
}

impl FetcherConfig {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: ProviderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fail the whole batch when any currency cannot be resolved.
    pub fn strict(mut self) -> Self {
        self.skip_failed_currencies = false;
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<FetchStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_hacienda_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.hacienda_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            credentials: ProviderCredentials::default(),
            policy: ProviderPolicy::default(),
            skip_failed_currencies: true,
            strategies: FetchStrategy::bccr_defaults(),
            hacienda_base_url: HACIENDA_BASE_URL.to_string(),
            token_audience: BCCR_TOKEN_AUDIENCE.to_string(),
        }
    }
}
