//! # Tipos de Cambio Types
//!
//! Domain types and port traits for the exchange rate fetcher.
//! This crate has ZERO external IO dependencies - only data structures,
//! configuration values, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Requests, credentials, fetch strategies and fetcher configuration
//! - `ports/` - Trait definitions that adapters must implement (HTTP transport)
//! - `error/` - The fetch error taxonomy

pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    DEFAULT_LOOKBACK_DAYS, DateFormat, EndpointAttempt, FetchStrategy, FetcherConfig,
    ProviderCredentials, ProviderPolicy, RateQuoteResult, RateRequest,
};
pub use error::{ErrorKind, FetchError};
pub use ports::{HttpRequest, HttpResponse, HttpTransport};
pub use rates_core::CurrencyCode;
