//! Exchange rate table with atomic replacement.

use crate::Currency;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// GBP-per-unit exchange rates.
///
/// `usd` is how many GBP one US dollar buys, so conversion to base is
/// always a multiply. `version` increments on every replacement so log
/// lines can attribute a verdict to the table that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub usd: f64,
    pub eur: f64,
    pub version: u64,
}

impl RateTable {
    /// Fallback USD rate used until the first successful refresh.
    pub const FALLBACK_USD: f64 = 0.79;
    /// Fallback EUR rate used until the first successful refresh.
    pub const FALLBACK_EUR: f64 = 0.85;

    pub fn new(usd: f64, eur: f64) -> Self {
        Self {
            usd,
            eur,
            version: 0,
        }
    }

    /// Hardcoded rates for when the rate service has never answered.
    pub fn fallback() -> Self {
        Self::new(Self::FALLBACK_USD, Self::FALLBACK_EUR)
    }

    /// GBP per one unit of `currency`.
    pub fn rate(&self, currency: Currency) -> f64 {
        match currency {
            Currency::GBP => 1.0,
            Currency::USD => self.usd,
            Currency::EUR => self.eur,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Process-wide handle to the current rate table.
///
/// Readers clone out the current `Arc<RateTable>` and keep using it for the
/// duration of one alert; a refresh swaps the whole table in a single
/// store. A reader holds either the old table or the new one, never a mix.
#[derive(Clone)]
pub struct SharedRates {
    inner: Arc<RwLock<Arc<RateTable>>>,
}

impl SharedRates {
    pub fn new(table: RateTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Snapshot of the current table.
    pub fn current(&self) -> Arc<RateTable> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            // A poisoned lock still holds a complete table.
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new table, bumping the version.
    pub fn replace(&self, mut table: RateTable) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        table.version = guard.version + 1;
        *guard = Arc::new(table);
    }
}

impl Default for SharedRates {
    fn default() -> Self {
        Self::new(RateTable::fallback())
    }
}
