//! Domain models for the exchange rate fetcher.

pub mod config;
pub mod credentials;
pub mod request;
pub mod strategy;

pub use config::{FetcherConfig, ProviderPolicy};
pub use credentials::ProviderCredentials;
pub use request::{DEFAULT_LOOKBACK_DAYS, RateQuoteResult, RateRequest};
pub use strategy::{DateFormat, EndpointAttempt, FetchStrategy};
