//! # Tipos de Cambio HTTP Client
//!
//! A [`HttpTransport`] backed by reqwest, used by the CLI and by hosts that
//! do not bring their own HTTP stack.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use tipos_cambio_types::{FetchError, HttpRequest, HttpResponse, HttpTransport};

/// Per-request timeout when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Sent with every request.
pub const USER_AGENT: &str = concat!("tipos-cambio/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed transport with a fixed timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { http, timeout })
    }

    /// Timeout applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse, FetchError> {
        let mut req = self.http.get(&request.url).query(&request.query);
        if let Some(token) = &request.bearer_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| network_error(&request.url, e))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| network_error(&request.url, e))?;

        tracing::debug!(url = %request.url, status, bytes = body.len(), "HTTP response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

fn network_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Network(format!("{}: request timed out", url))
    } else {
        FetchError::Network(format!("{}: {}", url, err))
    }
}
