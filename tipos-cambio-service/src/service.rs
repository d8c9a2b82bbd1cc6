//! Exchange Rate Application Service
//!
//! Resolves a batch of currencies, one at a time, through the configured
//! provider policy. Contains NO HTTP client logic - requests go through the
//! injected transport.

use rates_core::CurrencyCode;
use tipos_cambio_types::{
    FetchError, FetcherConfig, HttpTransport, ProviderPolicy, RateQuoteResult, RateRequest,
};

use crate::{bccr, hacienda};

/// Application service for rate fetching.
///
/// Generic over `T: HttpTransport` - the adapter is injected at compile time.
/// Currencies, providers and endpoints are tried strictly in sequence; no two
/// requests are ever in flight together.
pub struct RateFetcher<T: HttpTransport> {
    transport: T,
    config: FetcherConfig,
}

impl<T: HttpTransport> RateFetcher<T> {
    /// Creates a new fetcher with the given transport and configuration.
    pub fn new(transport: T, config: FetcherConfig) -> Self {
        Self { transport, config }
    }

    /// Returns a reference to the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Batch
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves every requested currency.
    ///
    /// In lenient mode (`skip_failed_currencies`) a currency that fails, or is
    /// not supported, is logged and left out of the result. In strict mode an
    /// unsupported code is rejected before any request is sent, and the first
    /// fetch failure is returned.
    pub async fn fetch_rates(&self, request: &RateRequest) -> Result<RateQuoteResult, FetchError> {
        let lenient = self.config.skip_failed_currencies;
        let currencies = self.resolve_codes(&request.currency_codes)?;
        let mut rates = RateQuoteResult::new();

        for currency in currencies {
            match self.fetch_currency(currency, request).await {
                Ok(rate) => {
                    tracing::info!(currency = %currency, rate, "Resolved exchange rate");
                    rates.insert(currency.code().to_string(), rate);
                }
                Err(err) if lenient => {
                    tracing::warn!(currency = %currency, error = %err, "Skipping currency");
                }
                Err(err) => return Err(err),
            }
        }

        if rates.is_empty() && !request.currency_codes.is_empty() {
            tracing::warn!(
                date = %request.target_date,
                "No exchange rate could be resolved"
            );
        }
        Ok(rates)
    }

    /// Parses and de-duplicates the requested codes, keeping request order.
    fn resolve_codes(&self, codes: &[String]) -> Result<Vec<CurrencyCode>, FetchError> {
        let mut currencies: Vec<CurrencyCode> = Vec::with_capacity(codes.len());
        for raw in codes {
            let currency = match raw.parse::<CurrencyCode>() {
                Ok(currency) => currency,
                Err(_) if self.config.skip_failed_currencies => {
                    tracing::warn!(currency = %raw, "Skipping unsupported currency");
                    continue;
                }
                Err(msg) => return Err(FetchError::Configuration(msg)),
            };
            if !currencies.contains(&currency) {
                currencies.push(currency);
            }
        }
        Ok(currencies)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Single currency
    // ─────────────────────────────────────────────────────────────────────────────

    /// Resolves one currency through the provider policy.
    ///
    /// Hacienda-first falls back to BCCR only when a token is configured;
    /// without one, Hacienda's error is returned as is.
    pub async fn fetch_currency(
        &self,
        currency: CurrencyCode,
        request: &RateRequest,
    ) -> Result<f64, FetchError> {
        match self.config.policy {
            ProviderPolicy::BccrOnly => self.fetch_bccr(currency, request).await,
            ProviderPolicy::HaciendaOnly => self.fetch_hacienda(currency).await,
            ProviderPolicy::HaciendaWithBccrFallback => {
                let err = match self.fetch_hacienda(currency).await {
                    Ok(rate) => return Ok(rate),
                    Err(err) => err,
                };
                if !self.config.credentials.has_token() {
                    tracing::debug!(currency = %currency, "No BCCR token; fallback disabled");
                    return Err(err);
                }
                tracing::warn!(
                    currency = %currency,
                    error = %err,
                    "Hacienda failed, falling back to BCCR"
                );
                self.fetch_bccr(currency, request).await
            }
        }
    }

    /// Resolves one currency from BCCR, using its configured indicator.
    pub async fn fetch_bccr(
        &self,
        currency: CurrencyCode,
        request: &RateRequest,
    ) -> Result<f64, FetchError> {
        let indicator = bccr::indicator_for(&self.config.credentials, currency)?;
        bccr::fetch_indicator(&self.transport, &self.config, indicator, request).await
    }

    /// Resolves one currency from Hacienda.
    pub async fn fetch_hacienda(&self, currency: CurrencyCode) -> Result<f64, FetchError> {
        hacienda::fetch_rate(&self.transport, &self.config.hacienda_base_url, currency).await
    }
}
