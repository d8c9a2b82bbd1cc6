//! Fetch strategies: the ordered endpoint/date-format combinations tried for
//! a BCCR indicator, and the record kept for each attempt.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// BCCR REST indicator endpoint (JSON rows, bearer token).
pub const BCCR_REST_ENDPOINT: &str =
    "https://gee.bccr.fi.cr/indicadoreseconomicos/api/Indicador/ObtenerIndicador";

/// BCCR legacy web service endpoint (XML, possibly wrapped in `<string>`).
pub const BCCR_LEGACY_ENDPOINT: &str = "https://gee.bccr.fi.cr/Indicadores/Suscripciones/WS/wsindicadoreseconomicos.asmx/ObtenerIndicadoresEconomicosXML";

/// Date serialization accepted by the BCCR endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    /// `dd/mm/yyyy`
    DayMonthYear,
    /// `yyyy-mm-dd`
    Iso,
}

impl DateFormat {
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            DateFormat::DayMonthYear => date.format("%d/%m/%Y").to_string(),
            DateFormat::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::DayMonthYear => write!(f, "dd/mm/yyyy"),
            DateFormat::Iso => write!(f, "yyyy-mm-dd"),
        }
    }
}

/// One endpoint/date-format combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStrategy {
    pub endpoint: String,
    pub date_format: DateFormat,
    /// Send `Authorization: Bearer <token>`.
    pub bearer_auth: bool,
}

impl FetchStrategy {
    pub fn new(endpoint: impl Into<String>, date_format: DateFormat, bearer_auth: bool) -> Self {
        Self {
            endpoint: endpoint.into(),
            date_format,
            bearer_auth,
        }
    }

    /// REST endpoint first, then the legacy XML service, each with both date formats.
    pub fn bccr_defaults() -> Vec<Self> {
        vec![
            Self::new(BCCR_REST_ENDPOINT, DateFormat::Iso, true),
            Self::new(BCCR_REST_ENDPOINT, DateFormat::DayMonthYear, true),
            Self::new(BCCR_LEGACY_ENDPOINT, DateFormat::DayMonthYear, false),
            Self::new(BCCR_LEGACY_ENDPOINT, DateFormat::Iso, false),
        ]
    }
}

/// What happened when one strategy was tried.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointAttempt {
    pub endpoint: String,
    pub date_format: DateFormat,
    /// `None` when no response arrived.
    pub status: Option<u16>,
    pub outcome: Result<f64, String>,
}

impl EndpointAttempt {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}
