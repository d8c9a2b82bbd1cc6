//! Port traits (interfaces for adapters).
//!
//! The fetcher depends on these traits, not on a concrete HTTP client.

mod transport;

pub use transport::{HttpRequest, HttpResponse, HttpTransport};
