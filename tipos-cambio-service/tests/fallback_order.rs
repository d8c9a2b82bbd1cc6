//! Integration tests for the BCCR endpoint fallback.
//!
//! These drive the public API with a scripted transport and check the
//! attempt record that operators see when every strategy fails.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tipos_cambio_service::bccr::fetch_indicator_with_attempts;
use tipos_cambio_service::{RateFetcher, run_fallback};
use tipos_cambio_types::domain::strategy::{BCCR_LEGACY_ENDPOINT, BCCR_REST_ENDPOINT};
use tipos_cambio_types::{
    DateFormat, ErrorKind, FetchError, FetchStrategy, FetcherConfig, HttpRequest, HttpResponse,
    HttpTransport, ProviderCredentials, ProviderPolicy, RateRequest,
};

/// Replays `(status, body)` pairs in order; records every request.
struct Scripted {
    responses: Mutex<VecDeque<(u16, &'static str)>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl Scripted {
    fn new(responses: &[(u16, &'static str)]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().copied().collect()),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for Scripted {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        self.sent.lock().unwrap().push(request.clone());
        match self.responses.lock().unwrap().pop_front() {
            Some((status, body)) => Ok(HttpResponse::new(status, body)),
            None => Err(FetchError::Network("connection reset".into())),
        }
    }
}

fn config() -> FetcherConfig {
    FetcherConfig::new(ProviderCredentials::new(
        "ana@empresa.cr",
        Some("opaque-token".into()),
    ))
    .with_policy(ProviderPolicy::BccrOnly)
}

fn request() -> RateRequest {
    RateRequest::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), ["USD"])
}

#[tokio::test]
async fn test_every_default_strategy_is_recorded() {
    let transport = Scripted::new(&[
        (500, ""),
        (404, r#"{"mensaje": "recurso no encontrado"}"#),
        (200, "<Datos_de_INGC011_CAT_INDICADORECONOMIC/>"),
        (200, "[]"),
    ]);

    let outcome = fetch_indicator_with_attempts(&transport, &config(), "318", &request()).await;

    let order: Vec<(&str, DateFormat)> = outcome
        .attempts
        .iter()
        .map(|a| (a.endpoint.as_str(), a.date_format))
        .collect();
    assert_eq!(
        order,
        vec![
            (BCCR_REST_ENDPOINT, DateFormat::Iso),
            (BCCR_REST_ENDPOINT, DateFormat::DayMonthYear),
            (BCCR_LEGACY_ENDPOINT, DateFormat::DayMonthYear),
            (BCCR_LEGACY_ENDPOINT, DateFormat::Iso),
        ]
    );
    assert_eq!(
        outcome.attempts.iter().map(|a| a.status).collect::<Vec<_>>(),
        vec![Some(500), Some(404), Some(200), Some(200)]
    );
    assert!(outcome.attempts.iter().all(|a| !a.succeeded()));

    let err = outcome.result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoData);
    assert_eq!(transport.sent().len(), 4);
}

#[tokio::test]
async fn test_success_on_third_strategy_stops_there() {
    let transport = Scripted::new(&[
        (500, ""),
        (200, "[]"),
        (
            200,
            "<string xmlns=\"http://ws.sdde.bccr.fi.cr\">&lt;Datos&gt;&lt;INGC011_CAT_INDICADORECONOMIC&gt;\
             &lt;NUM_VALOR&gt;506.2300&lt;/NUM_VALOR&gt;&lt;/INGC011_CAT_INDICADORECONOMIC&gt;&lt;/Datos&gt;</string>",
        ),
        (200, r#"[{"NumValor": 1.0}]"#),
    ]);

    let outcome = fetch_indicator_with_attempts(&transport, &config(), "318", &request()).await;

    assert_eq!(outcome.result, Ok(506.23));
    assert_eq!(outcome.attempts.len(), 3);
    assert!(outcome.attempts[2].succeeded());
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test]
async fn test_custom_strategies_through_run_fallback() {
    let transport = Scripted::new(&[(200, r#"[{"NumValor": "700,5"}]"#)]);
    let strategies = vec![FetchStrategy::new(
        "http://localhost:8080/indicador",
        DateFormat::Iso,
        false,
    )];

    let outcome = run_fallback(
        &transport,
        &strategies,
        |s| HttpRequest::get(&s.endpoint).query("Indicador", "999"),
        "indicator 999",
    )
    .await;

    assert_eq!(outcome.result, Ok(700.5));
    assert_eq!(
        transport.sent()[0].query_value("Indicador"),
        Some("999")
    );
}

#[tokio::test]
async fn test_shared_transport_across_fetchers() {
    let transport = Scripted::new(&[
        (200, r#"{"venta": {"valor": 512.3}}"#),
        (200, r#"{"colones": 650.5}"#),
    ]);
    let config = FetcherConfig::default().with_policy(ProviderPolicy::HaciendaOnly);
    let fetcher = RateFetcher::new(Arc::clone(&transport), config);

    let rates = fetcher
        .fetch_rates(&RateRequest::new(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            ["USD", "EUR"],
        ))
        .await
        .unwrap();

    assert_eq!(rates.get("USD"), Some(&512.3));
    assert_eq!(rates.get("EUR"), Some(&650.5));
    assert_eq!(transport.sent().len(), 2);
}
