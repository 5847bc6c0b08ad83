//! Profitability evaluation.

use flipwatch_core::{Money, ProfitTier, ResaleSummary, Verdict};

/// Profit thresholds in GBP. Tier boundaries are strict: a profit exactly
/// at a threshold lands in the band below it.
#[derive(Debug, Clone)]
pub struct ProfitPolicy {
    pub high_profit_gbp: f64,
    pub profitable_gbp: f64,
}

impl Default for ProfitPolicy {
    fn default() -> Self {
        Self {
            high_profit_gbp: 50.0,
            profitable_gbp: 20.0,
        }
    }
}

/// Combine the purchase price and resale summary into a verdict.
///
/// Pure: no IO, no clock. The resale median is the reference value, robust
/// to the odd outlier listing. `purchase` is expected in GBP (the extractor
/// converts). A missing summary yields a legitimate `NoData` verdict; a
/// missing purchase price evaluates at zero with `purchase_observed`
/// cleared so rendering says "unknown" rather than "free".
pub fn evaluate(
    purchase: Option<Money>,
    resale: Option<ResaleSummary>,
    policy: &ProfitPolicy,
) -> Verdict {
    let purchase_observed = purchase.is_some();
    let purchase = purchase.unwrap_or_else(|| Money::gbp(0.0));

    let Some(summary) = resale else {
        return Verdict {
            purchase,
            purchase_observed,
            resale: None,
            profit: 0.0,
            profit_percent: 0.0,
            tier: ProfitTier::NoData,
        };
    };

    let profit = summary.median - purchase.amount;
    let profit_percent = if purchase.amount > 0.0 {
        profit / purchase.amount * 100.0
    } else {
        0.0
    };

    let tier = if summary.median <= purchase.amount {
        ProfitTier::LowOrNoProfit
    } else if profit > policy.high_profit_gbp {
        ProfitTier::HighProfit
    } else if profit > policy.profitable_gbp {
        ProfitTier::Profitable
    } else {
        ProfitTier::SmallProfit
    };

    Verdict {
        purchase,
        purchase_observed,
        resale: Some(summary),
        profit,
        profit_percent,
        tier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(median: f64) -> ResaleSummary {
        ResaleSummary {
            mean: median,
            median,
            min: median,
            max: median,
            count: 5,
            query_used: "q".to_string(),
        }
    }

    // === Tier ladder at a £10 purchase ===

    #[test]
    fn test_high_profit() {
        let verdict = evaluate(
            Some(Money::gbp(10.0)),
            Some(summary(61.0)),
            &ProfitPolicy::default(),
        );
        assert_eq!(verdict.tier, ProfitTier::HighProfit);
        assert_eq!(verdict.profit, 51.0);
    }

    #[test]
    fn test_profitable() {
        let verdict = evaluate(
            Some(Money::gbp(10.0)),
            Some(summary(31.0)),
            &ProfitPolicy::default(),
        );
        assert_eq!(verdict.tier, ProfitTier::Profitable);
        assert_eq!(verdict.profit, 21.0);
    }

    #[test]
    fn test_small_profit() {
        let verdict = evaluate(
            Some(Money::gbp(10.0)),
            Some(summary(10.01)),
            &ProfitPolicy::default(),
        );
        assert_eq!(verdict.tier, ProfitTier::SmallProfit);
        assert!(verdict.profit > 0.0);
    }

    #[test]
    fn test_median_equal_to_purchase() {
        let verdict = evaluate(
            Some(Money::gbp(10.0)),
            Some(summary(10.0)),
            &ProfitPolicy::default(),
        );
        assert_eq!(verdict.tier, ProfitTier::LowOrNoProfit);
        assert_eq!(verdict.profit, 0.0);
    }

    #[test]
    fn test_loss_is_reported_not_clamped() {
        let verdict = evaluate(
            Some(Money::gbp(10.0)),
            Some(summary(8.0)),
            &ProfitPolicy::default(),
        );
        assert_eq!(verdict.tier, ProfitTier::LowOrNoProfit);
        assert_eq!(verdict.profit, -2.0);
        assert_eq!(verdict.profit_percent, -20.0);
    }

    #[test]
    fn test_no_resale_data() {
        let verdict = evaluate(Some(Money::gbp(10.0)), None, &ProfitPolicy::default());
        assert_eq!(verdict.tier, ProfitTier::NoData);
        assert_eq!(verdict.resale, None);
        assert_eq!(verdict.profit, 0.0);
    }

    // === Boundaries are strict ===

    #[test]
    fn test_thresholds_are_exclusive() {
        let policy = ProfitPolicy::default();
        let at_high = evaluate(Some(Money::gbp(10.0)), Some(summary(60.0)), &policy);
        assert_eq!(at_high.tier, ProfitTier::Profitable);

        let at_profitable = evaluate(Some(Money::gbp(10.0)), Some(summary(30.0)), &policy);
        assert_eq!(at_profitable.tier, ProfitTier::SmallProfit);
    }

    #[test]
    fn test_custom_policy() {
        let policy = ProfitPolicy {
            high_profit_gbp: 5.0,
            profitable_gbp: 1.0,
        };
        let verdict = evaluate(Some(Money::gbp(10.0)), Some(summary(16.0)), &policy);
        assert_eq!(verdict.tier, ProfitTier::HighProfit);
    }

    // === Missing purchase price ===

    #[test]
    fn test_unknown_purchase_is_not_free() {
        let verdict = evaluate(None, Some(summary(30.0)), &ProfitPolicy::default());
        assert!(!verdict.purchase_observed);
        assert_eq!(verdict.purchase, Money::gbp(0.0));
        assert_eq!(verdict.profit, 30.0);
        // Division guard: no percent against a zero purchase.
        assert_eq!(verdict.profit_percent, 0.0);
    }

    #[test]
    fn test_booster_box_fixture() {
        // Purchase £45 against sold prices 60/65/70: profit is £20.00,
        // which does not clear the £20 threshold.
        let resale = ResaleSummary::from_prices(&[60.0, 65.0, 70.0], "\"x\"").unwrap();
        let verdict = evaluate(Some(Money::gbp(45.0)), Some(resale), &ProfitPolicy::default());
        assert_eq!(verdict.profit, 20.0);
        assert_eq!(verdict.tier, ProfitTier::SmallProfit);
    }
}
