//! Ministry of Finance (Hacienda) exchange rate endpoints.
//!
//! One fixed URL per currency, no query parameters and no credentials. The
//! service always answers with today's rate.

use rates_core::{CurrencyCode, Payload, PayloadError, extract_message, hacienda_rate};
use tipos_cambio_types::{FetchError, HttpRequest, HttpTransport};

/// Endpoint for a currency under the given base URL.
pub fn hacienda_url(base_url: &str, currency: CurrencyCode) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        currency.hacienda_path()
    )
}

/// Fetches the current Hacienda rate for a currency.
pub async fn fetch_rate<T>(
    transport: &T,
    base_url: &str,
    currency: CurrencyCode,
) -> Result<f64, FetchError>
where
    T: HttpTransport + ?Sized,
{
    let request = HttpRequest::get(hacienda_url(base_url, currency));
    let response = transport.get(&request).await?;

    if !response.is_success() {
        let detail = extract_message(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        return Err(FetchError::HttpStatus {
            status: response.status,
            detail,
        });
    }

    let payload = Payload::classify(&response.body);
    let rate = hacienda_rate(&payload, currency.hacienda_field()).map_err(|err| match err {
        PayloadError::MissingField(field) => {
            FetchError::NoData(format!("Hacienda returned no \"{}\" for {}", field, currency))
        }
        other => FetchError::Parse(format!("Hacienda {}: {}", currency, other)),
    })?;

    tracing::debug!(currency = %currency, rate, "Hacienda rate");
    Ok(rate)
}
