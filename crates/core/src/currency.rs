//! Currencies accepted on inbound prices.

use serde::{Deserialize, Serialize};

/// Currency of an observed price.
///
/// GBP is the base currency: every summary statistic and every verdict is
/// computed in GBP, with other currencies converted at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// Pound sterling (base currency)
    GBP,
    /// US dollar
    USD,
    /// Euro
    EUR,
}

impl Currency {
    /// Parse from an ISO code, case-insensitive.
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GBP" => Some(Currency::GBP),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            _ => None,
        }
    }

    /// Canonical ISO code.
    pub fn as_str(self) -> &'static str {
        match self {
            Currency::GBP => "GBP",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Display symbol.
    pub fn symbol(self) -> char {
        match self {
            Currency::GBP => '£',
            Currency::USD => '$',
            Currency::EUR => '€',
        }
    }

    /// Check if this is the base currency (no conversion needed).
    pub fn is_base(self) -> bool {
        matches!(self, Currency::GBP)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::GBP
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Currency::from_code("GBP"), Some(Currency::GBP));
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("Eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("JPY"), None);
        assert_eq!(Currency::from_code(""), None);
    }

    #[test]
    fn test_code_roundtrip() {
        for currency in [Currency::GBP, Currency::USD, Currency::EUR] {
            assert_eq!(Currency::from_code(currency.as_str()), Some(currency));
        }
    }

    #[test]
    fn test_is_base() {
        assert!(Currency::GBP.is_base());
        assert!(!Currency::USD.is_base());
        assert!(!Currency::EUR.is_base());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Currency::GBP), "GBP");
        assert_eq!(format!("{}", Currency::EUR), "EUR");
        assert_eq!(Currency::USD.symbol(), '$');
        assert_eq!(Currency::GBP.symbol(), '£');
    }
}
