//! # Tipos de Cambio Service
//!
//! Application service that resolves USD/EUR exchange rates from the Costa
//! Rican Ministry of Finance (Hacienda) and Central Bank (BCCR).
//!
//! ## Architecture
//!
//! - `service` - [`RateFetcher`], the per-currency provider policy
//! - `bccr` / `hacienda` - request building and extraction per provider
//! - `fallback` - ordered endpoint/date-format attempts for one indicator
//! - `token` - local, unverified inspection of the BCCR bearer token
//!
//! The fetcher is generic over `T: HttpTransport`, so a real HTTP client or
//! a scripted mock can be injected.

pub mod bccr;
pub mod fallback;
pub mod hacienda;
pub mod service;
pub mod token;


pub use fallback::{FallbackOutcome, run_fallback};
pub use service::RateFetcher;
pub use token::inspect_token;
