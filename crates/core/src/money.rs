//! Money values and base-currency conversion.

use crate::{Currency, RateTable};
use serde::{Deserialize, Serialize};

/// An amount of money in a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Money {
    pub amount: f64,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Convenience constructor for base-currency amounts.
    pub fn gbp(amount: f64) -> Self {
        Self::new(amount, Currency::GBP)
    }

    /// Convert to GBP using the supplied rate table.
    ///
    /// GBP passes through unchanged; other currencies multiply by the
    /// table's GBP-per-unit rate.
    pub fn to_gbp(self, rates: &RateTable) -> Money {
        if self.currency.is_base() {
            return self;
        }
        Money::gbp(self.amount * rates.rate(self.currency))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:.2}", self.currency.symbol(), self.amount)
    }
}
