//! Resale statistics and profitability verdicts.

use crate::{Money, RateTable};
use serde::{Deserialize, Serialize};

/// One observed sold price and the query variant that found it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: Money,
    pub query: String,
}

impl PriceSample {
    pub fn new(price: Money, query: impl Into<String>) -> Self {
        Self {
            price,
            query: query.into(),
        }
    }
}

/// Summary statistics over at least one positive GBP sample.
///
/// Zero usable samples yields no summary at all: downstream code treats the
/// absence of a `ResaleSummary` as "no data", which is not the same thing
/// as a resale value of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResaleSummary {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// The query variant that produced these samples.
    pub query_used: String,
}

impl ResaleSummary {
    /// Summarize raw GBP amounts, discarding non-positive values.
    ///
    /// The median of an even-sized sample set is the mean of the two middle
    /// values.
    pub fn from_prices(prices: &[f64], query_used: &str) -> Option<Self> {
        let mut sorted: Vec<f64> = prices.iter().copied().filter(|p| *p > 0.0).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Some(Self {
            mean,
            median,
            min: sorted[0],
            max: sorted[count - 1],
            count,
            query_used: query_used.to_string(),
        })
    }

    /// Summarize observed samples, converting each to GBP first.
    pub fn from_samples(samples: &[PriceSample], rates: &RateTable) -> Option<Self> {
        let query_used = samples.first().map(|s| s.query.clone())?;
        let prices: Vec<f64> = samples
            .iter()
            .map(|s| s.price.to_gbp(rates).amount)
            .collect();
        Self::from_prices(&prices, &query_used)
    }
}

/// Profitability band of a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfitTier {
    /// Estimated profit clears the high-profit threshold.
    HighProfit,
    /// Estimated profit clears the profitable threshold.
    Profitable,
    /// Positive but small estimated profit.
    SmallProfit,
    /// Resale median at or below the purchase price.
    LowOrNoProfit,
    /// No resale data was found; research required.
    NoData,
}

impl ProfitTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfitTier::HighProfit => "high_profit",
            ProfitTier::Profitable => "profitable",
            ProfitTier::SmallProfit => "small_profit",
            ProfitTier::LowOrNoProfit => "low_or_no_profit",
            ProfitTier::NoData => "no_data",
        }
    }

    /// Whether resale data existed and the median cleared the purchase.
    pub fn is_profitable(self) -> bool {
        matches!(
            self,
            ProfitTier::HighProfit | ProfitTier::Profitable | ProfitTier::SmallProfit
        )
    }
}

impl std::fmt::Display for ProfitTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The pipeline's answer for one alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Purchase price in GBP. Zero when the alert carried no price.
    pub purchase: Money,
    /// False when no purchase price was found. A zero purchase then means
    /// "unknown", not "free".
    pub purchase_observed: bool,
    pub resale: Option<ResaleSummary>,
    /// Resale median minus purchase, in GBP. Negative on expected losses.
    pub profit: f64,
    pub profit_percent: f64,
    pub tier: ProfitTier,
}
