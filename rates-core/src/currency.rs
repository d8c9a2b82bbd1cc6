//! Currencies published by the Costa Rican rate sources.
//!
//! Each currency carries the metadata both providers need: the BCCR series
//! that holds its sale rate and the Hacienda path and field where its rate
//! lives.

use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Hacienda field layout
// ─────────────────────────────────────────────────────────────────────────────

/// Where a Hacienda response keeps the rate for a currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HaciendaField {
    /// `{"venta": {"valor": N}}`
    SaleValue,
    /// `{"colones": N}`, a fixed conversion to colones.
    Colones,
}

impl HaciendaField {
    /// JSON path segments leading to the value.
    pub fn path(&self) -> &'static [&'static str] {
        match self {
            HaciendaField::SaleValue => &["venta", "valor"],
            HaciendaField::Colones => &["colones"],
        }
    }
}

impl fmt::Display for HaciendaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path().join("."))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines all currencies and the CurrencyCode enum
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define the supported currencies and their provider metadata.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("CODE", "SYMBOL", "bccr_indicator", "hacienda_path", HaciendaField::Variant),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $indicator:literal, $hacienda_path:literal, $field:expr)
        ),* $(,)?
    ) => {
        /// ISO code of a currency the fetcher knows how to resolve.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            /// BCCR indicator code of the sale-rate series for this currency.
            pub fn default_bccr_indicator(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $indicator),*
                }
            }

            /// Last path segment of the Hacienda endpoint for this currency.
            pub fn hacienda_path(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $hacienda_path),*
                }
            }

            pub fn hacienda_field(&self) -> $crate::HaciendaField {
                match self {
                    $(CurrencyCode::$name => $field),*
                }
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(format!("Unknown currency: {}", s)),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "$", "318", "dolar", HaciendaField::SaleValue),
    EUR => ("EUR", "€", "333", "euro", HaciendaField::Colones),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!(" eur ".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert!("GBP".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::USD.to_string(), "USD");
        assert_eq!(CurrencyCode::EUR.symbol(), "€");
    }

    #[test]
    fn test_provider_metadata() {
        assert_eq!(CurrencyCode::USD.default_bccr_indicator(), "318");
        assert_eq!(CurrencyCode::EUR.default_bccr_indicator(), "333");
        assert_eq!(CurrencyCode::USD.hacienda_path(), "dolar");
        assert_eq!(CurrencyCode::EUR.hacienda_field(), HaciendaField::Colones);
        assert_eq!(HaciendaField::SaleValue.to_string(), "venta.valor");
    }

    #[test]
    fn test_currency_code_all() {
        assert_eq!(CurrencyCode::all(), &[CurrencyCode::USD, CurrencyCode::EUR]);
    }
}
