//! Central Bank (BCCR) indicator service.
//!
//! Builds the indicator query for each configured strategy and runs them
//! through [`run_fallback`]. Authentication failures get the local token
//! diagnostics attached before they are returned.

use chrono::{NaiveDate, Utc};
use rates_core::CurrencyCode;
use tipos_cambio_types::{
    DateFormat, FetchError, FetchStrategy, FetcherConfig, HttpRequest, HttpTransport,
    ProviderCredentials, RateRequest,
};

use crate::fallback::{FallbackOutcome, run_fallback};
use crate::token::inspect_token;

/// Builds the indicator query for one strategy.
///
/// Parameters go out in the order the service documents them.
pub fn build_request(
    strategy: &FetchStrategy,
    credentials: &ProviderCredentials,
    token: &str,
    indicator: &str,
    window: (NaiveDate, NaiveDate),
) -> HttpRequest {
    let (start, end) = window;
    let format = strategy.date_format;

    let request = HttpRequest::get(&strategy.endpoint)
        .query("Indicador", indicator)
        .query("FechaInicio", format.format(start))
        .query("FechaFinal", format.format(end))
        .query("Nombre", credentials.display_name())
        .query("CorreoElectronico", credentials.email.trim())
        .query("SubNiveles", "N")
        .query("Token", token);

    if strategy.bearer_auth {
        request.bearer(token)
    } else {
        request
    }
}

/// Fetches the latest value of an indicator within the request's window.
pub async fn fetch_indicator<T>(
    transport: &T,
    config: &FetcherConfig,
    indicator: &str,
    request: &RateRequest,
) -> Result<f64, FetchError>
where
    T: HttpTransport + ?Sized,
{
    fetch_indicator_with_attempts(transport, config, indicator, request)
        .await
        .result
}

/// Same as [`fetch_indicator`], keeping the record of every attempt.
pub async fn fetch_indicator_with_attempts<T>(
    transport: &T,
    config: &FetcherConfig,
    indicator: &str,
    request: &RateRequest,
) -> FallbackOutcome
where
    T: HttpTransport + ?Sized,
{
    let credentials = &config.credentials;
    let token = match validate(credentials, indicator) {
        Ok(token) => token,
        Err(err) => {
            return FallbackOutcome {
                result: Err(err),
                attempts: Vec::new(),
            };
        }
    };

    let window = request.window();
    let subject = format!(
        "indicator {} between {} and {}",
        indicator,
        DateFormat::Iso.format(window.0),
        DateFormat::Iso.format(window.1)
    );

    let FallbackOutcome { result, attempts } = run_fallback(
        transport,
        &config.strategies,
        |strategy| build_request(strategy, credentials, token, indicator, window),
        &subject,
    )
    .await;

    let result = result.map_err(|err| {
        if !err.is_auth() {
            return err;
        }
        let warnings = inspect_token(
            token,
            &credentials.email,
            &config.token_audience,
            Utc::now(),
        );
        tracing::warn!(indicator, ?warnings, "BCCR rejected the token");
        err.with_token_diagnostics(&warnings)
    });
    FallbackOutcome { result, attempts }
}

/// The indicator configured for a currency.
pub fn indicator_for(
    credentials: &ProviderCredentials,
    currency: CurrencyCode,
) -> Result<&str, FetchError> {
    credentials.indicator(currency).ok_or_else(|| {
        FetchError::Configuration(format!("no BCCR indicator configured for {}", currency))
    })
}

fn validate<'a>(credentials: &'a ProviderCredentials, indicator: &str) -> Result<&'a str, FetchError> {
    if indicator.trim().is_empty() {
        return Err(FetchError::Configuration("BCCR indicator is required".into()));
    }
    if credentials.email.trim().is_empty() {
        return Err(FetchError::Configuration("BCCR email is required".into()));
    }
    credentials
        .token()
        .ok_or_else(|| FetchError::Configuration("BCCR token is required".into()))
}
