//! Purchase price extraction from alert fragments.

use flipwatch_core::{Currency, Fragment, FragmentRole, Money, RateTable};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Candidate amounts must lie strictly inside this interval; the bounds
/// themselves are rejected.
const MIN_PLAUSIBLE: f64 = 0.1;
const MAX_PLAUSIBLE: f64 = 100_000.0;

/// Numeral followed by an ISO code: "45.00 GBP", "1,299.99 USD".
static AMOUNT_THEN_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d[\d,]*(?:\.\d+)?)\s+(GBP|USD|EUR)\b").unwrap());

/// Symbol or code followed by a numeral: "£45", "$1,299.99", "USD 45".
static SYMBOL_THEN_AMOUNT: LazyLock<Vec<(Currency, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Currency::GBP,
            Regex::new(r"(?i)(?:£|\bGBP\b)\s*(\d[\d,]*(?:\.\d+)?)").unwrap(),
        ),
        (
            Currency::USD,
            Regex::new(r"(?i)(?:\$|\bUSD\b)\s*(\d[\d,]*(?:\.\d+)?)").unwrap(),
        ),
        (
            Currency::EUR,
            Regex::new(r"(?i)(?:€|\bEUR\b)\s*(\d[\d,]*(?:\.\d+)?)").unwrap(),
        ),
    ]
});

/// Scan ordered fragments for the first plausible purchase price.
///
/// Fragments arrive already promoted (price-labelled first) and tagged;
/// derived fragments are never scanned. The result is converted to GBP.
/// Absence is `None`: no stage downstream may read a missing price as zero.
pub fn extract_price(fragments: &[Fragment], rates: &RateTable) -> Option<Money> {
    for fragment in fragments {
        if fragment.role == FragmentRole::Derived {
            debug!(label = %fragment.label, "skipping derived price fragment");
            continue;
        }
        if let Some(price) = scan_text(&fragment.text) {
            debug!(label = %fragment.label, %price, "extracted purchase price");
            return Some(price.to_gbp(rates));
        }
    }
    None
}

/// Try both price sub-formats against one piece of text.
///
/// Numeral-then-code is preferred; the symbol form is tried per currency in
/// base-currency-first order.
pub fn scan_text(text: &str) -> Option<Money> {
    for caps in AMOUNT_THEN_CODE.captures_iter(text) {
        if let Some(amount) = parse_amount(&caps[1]) {
            if plausible(amount) {
                // The alternation only admits known codes.
                let currency = Currency::from_code(&caps[2])?;
                return Some(Money::new(amount, currency));
            }
        }
    }
    for (currency, pattern) in SYMBOL_THEN_AMOUNT.iter() {
        for caps in pattern.captures_iter(text) {
            if let Some(amount) = parse_amount(&caps[1]) {
                if plausible(amount) {
                    return Some(Money::new(amount, *currency));
                }
            }
        }
    }
    None
}

/// Strip thousands separators and parse. More than two decimal places is
/// not a price.
fn parse_amount(raw: &str) -> Option<f64> {
    if let Some((_, decimals)) = raw.split_once('.') {
        if decimals.len() > 2 {
            return None;
        }
    }
    raw.replace(',', "").parse().ok()
}

fn plausible(amount: f64) -> bool {
    amount > MIN_PLAUSIBLE && amount < MAX_PLAUSIBLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use flipwatch_core::{AlertField, AlertPayload};
    use pretty_assertions::assert_eq;

    fn payload_with(title: &str, fields: Vec<AlertField>) -> AlertPayload {
        AlertPayload {
            title: title.to_string(),
            fields,
            ..Default::default()
        }
    }

    // === Sub-formats ===

    #[test]
    fn test_symbol_form() {
        assert_eq!(scan_text("now £45 at retail"), Some(Money::gbp(45.0)));
        assert_eq!(
            scan_text("listed at $1,299.99 today"),
            Some(Money::new(1299.99, Currency::USD))
        );
        assert_eq!(
            scan_text("price €9.50"),
            Some(Money::new(9.5, Currency::EUR))
        );
    }

    #[test]
    fn test_code_adjacent_form() {
        assert_eq!(
            scan_text("USD 45 shipped"),
            Some(Money::new(45.0, Currency::USD))
        );
        assert_eq!(scan_text("gbp 12.99"), Some(Money::gbp(12.99)));
    }

    #[test]
    fn test_numeral_then_code_form() {
        assert_eq!(scan_text("45.00 GBP"), Some(Money::gbp(45.0)));
        assert_eq!(
            scan_text("sold for 1,299.99 usd each"),
            Some(Money::new(1299.99, Currency::USD))
        );
    }

    #[test]
    fn test_numeral_then_code_preferred() {
        // Both forms present: the numeral-then-code match wins even though
        // the symbol form appears first in the text.
        assert_eq!(
            scan_text("was $60, now 45.00 GBP"),
            Some(Money::gbp(45.0))
        );
    }

    // === Plausibility ===

    #[test]
    fn test_open_interval_bounds_rejected() {
        assert_eq!(scan_text("£0.10"), None);
        assert_eq!(scan_text("0.1 GBP"), None);
        assert_eq!(scan_text("£100,000"), None);
        assert_eq!(scan_text("£0.11"), Some(Money::gbp(0.11)));
        assert_eq!(scan_text("£99,999.99"), Some(Money::gbp(99_999.99)));
    }

    #[test]
    fn test_implausible_candidate_does_not_end_scan() {
        assert_eq!(scan_text("ref 150000 GBP lot, yours for £45"), Some(Money::gbp(45.0)));
    }

    #[test]
    fn test_too_many_decimals() {
        assert_eq!(scan_text("45.999 GBP"), None);
        assert_eq!(scan_text("£45.999"), None);
    }

    #[test]
    fn test_no_price() {
        assert_eq!(scan_text("Lego Castle 4709 set"), None);
        assert_eq!(scan_text(""), None);
    }

    // === Fragment walk ===

    #[test]
    fn test_price_labelled_field_wins() {
        let payload = payload_with(
            "Lego Castle",
            vec![
                AlertField::new("Seen at", "$99 on import sites"),
                AlertField::new("Price", "£45.00"),
            ],
        );
        let rates = RateTable::fallback();
        let price = extract_price(&payload.fragments(), &rates);
        assert_eq!(price, Some(Money::gbp(45.0)));
    }

    #[test]
    fn test_derived_fragments_skipped() {
        let payload = payload_with(
            "Lego Castle",
            vec![
                AlertField::new("Resell Price", "£90"),
                AlertField::new("Status", "yours for £45"),
            ],
        );
        let rates = RateTable::fallback();
        assert_eq!(
            extract_price(&payload.fragments(), &rates),
            Some(Money::gbp(45.0))
        );
    }

    #[test]
    fn test_result_is_gbp_normalized() {
        let payload = payload_with("Import deal $100", vec![]);
        let rates = RateTable::new(0.8, 0.9);
        assert_eq!(
            extract_price(&payload.fragments(), &rates),
            Some(Money::gbp(80.0))
        );
    }

    #[test]
    fn test_absent_price_is_none() {
        let payload = payload_with("Lego Castle", vec![AlertField::new("Status", "In stock")]);
        let rates = RateTable::fallback();
        assert_eq!(extract_price(&payload.fragments(), &rates), None);
    }
}
