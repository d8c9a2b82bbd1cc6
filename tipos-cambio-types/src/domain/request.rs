//! Rate requests and results.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// How far back the BCCR window reaches when the caller does not say.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

/// Resolved rates keyed by ISO currency code.
///
/// Only currencies that were resolved have a key.
pub type RateQuoteResult = BTreeMap<String, f64>;

/// What the host asks for: rates as of a date, for a set of currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
    pub target_date: NaiveDate,
    /// Days before `target_date` included in the BCCR query window, since the
    /// same-day value may not be published yet.
    pub lookback_days: u32,
    pub currency_codes: Vec<String>,
}

impl RateRequest {
    /// Creates a request with the default lookback window.
    pub fn new<I>(target_date: NaiveDate, currency_codes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            target_date,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            currency_codes: currency_codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    /// First and last day of the query window, both inclusive.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .target_date
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        (start, self.target_date)
    }
}
