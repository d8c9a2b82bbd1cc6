//! Endpoint/date-format fallback for a single indicator query.
//!
//! Strategies are tried in the order given. The first response carrying a
//! value wins; an authentication failure stops the loop at once; anything
//! else is remembered and the next strategy is tried. When every strategy
//! fails, the last remembered error is returned.

use rates_core::{Payload, is_auth_error, latest_indicator_value, message_from_payload};
use tipos_cambio_types::{
    EndpointAttempt, FetchError, FetchStrategy, HttpRequest, HttpResponse, HttpTransport,
};

/// Result of a fallback run, with one record per strategy actually tried.
#[derive(Debug, Clone)]
pub struct FallbackOutcome {
    pub result: Result<f64, FetchError>,
    pub attempts: Vec<EndpointAttempt>,
}

/// Tries each strategy in order until one yields a value.
///
/// `build` turns a strategy into the request to send. `subject` describes
/// what is being fetched and is used in the message when a response parses
/// but holds no value.
pub async fn run_fallback<T, F>(
    transport: &T,
    strategies: &[FetchStrategy],
    mut build: F,
    subject: &str,
) -> FallbackOutcome
where
    T: HttpTransport + ?Sized,
    F: FnMut(&FetchStrategy) -> HttpRequest,
{
    let mut attempts = Vec::with_capacity(strategies.len());
    let mut last_error = None;

    for strategy in strategies {
        let request = build(strategy);
        let (status, result) = match transport.get(&request).await {
            Ok(response) => (Some(response.status), read_indicator(&response, subject)),
            Err(err) => (None, Err(err)),
        };

        tracing::debug!(
            endpoint = %strategy.endpoint,
            date_format = %strategy.date_format,
            status = ?status,
            outcome = ?result,
            "BCCR attempt"
        );
        attempts.push(EndpointAttempt {
            endpoint: strategy.endpoint.clone(),
            date_format: strategy.date_format,
            status,
            outcome: result.as_ref().copied().map_err(ToString::to_string),
        });

        match result {
            Ok(rate) => {
                return FallbackOutcome {
                    result: Ok(rate),
                    attempts,
                };
            }
            Err(err) if err.is_auth() => {
                return FallbackOutcome {
                    result: Err(err),
                    attempts,
                };
            }
            Err(err) => last_error = Some(err),
        }
    }

    let error = last_error.unwrap_or_else(|| {
        FetchError::Configuration("no BCCR endpoint strategies configured".into())
    });
    FallbackOutcome {
        result: Err(error),
        attempts,
    }
}

/// Interprets one BCCR response: a value, or the reason there is none.
pub fn read_indicator(response: &HttpResponse, subject: &str) -> Result<f64, FetchError> {
    let status = response.status;
    let payload = Payload::classify(&response.body);
    let diagnostic = message_from_payload(&payload);

    let auth_failure = |detail: &str| FetchError::Authentication {
        status: Some(status),
        detail: detail.to_string(),
        diagnostics: None,
    };

    if !response.is_success() {
        let detail = diagnostic.unwrap_or_else(|| format!("HTTP {}", status));
        if is_auth_error(&detail) {
            return Err(auth_failure(&detail));
        }
        return Err(FetchError::HttpStatus { status, detail });
    }

    match latest_indicator_value(&payload) {
        Ok(Some(rate)) => Ok(rate),
        Ok(None) => match diagnostic {
            Some(detail) if is_auth_error(&detail) => Err(auth_failure(&detail)),
            Some(detail) => Err(FetchError::NoData(format!("no value for {}: {}", subject, detail))),
            None => Err(FetchError::NoData(format!("no value for {}", subject))),
        },
        Err(err) => match diagnostic {
            Some(detail) if is_auth_error(&detail) => Err(auth_failure(&detail)),
            Some(detail) => Err(FetchError::Parse(format!("{} ({})", err, detail))),
            None => Err(FetchError::Parse(err.to_string())),
        },
    }
}
