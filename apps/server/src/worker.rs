//! Per-alert pipeline execution.

use crate::state::SharedState;
use flipwatch_core::{AlertPayload, ProfitTier, Verdict};
use flipwatch_pipeline::{evaluate, extract_price, generate_queries, normalize_product};
use tracing::{debug, info, warn};

/// Run one alert through the full pipeline.
///
/// Stages run sequentially; concurrency across alerts comes from one
/// spawned task per alert. Failures are logged, never propagated, so one
/// alert cannot poison another.
pub async fn process_alert(state: SharedState, payload: AlertPayload) -> Verdict {
    info!(title = %payload.title, "Processing alert");

    let product = normalize_product(&payload.title);
    let fragments = payload.fragments();
    let rates = state.rates.current();

    let purchase = extract_price(&fragments, &rates);
    match &purchase {
        Some(price) => debug!(price = %price, "Purchase price extracted"),
        None => debug!("No purchase price in alert"),
    }

    let queries = generate_queries(&product.name, &state.query_policy);
    let resale = if queries.is_empty() {
        debug!(product = %product.name, "No usable queries");
        None
    } else {
        state.aggregator.aggregate(&queries, &rates).await
    };

    let verdict = evaluate(purchase, resale, &state.profit_policy);
    state.stats.record_verdict(verdict.tier == ProfitTier::NoData);

    info!(
        product = %product.name,
        tier = %verdict.tier,
        profit = verdict.profit,
        "Alert evaluated"
    );

    if let Some(notifier) = &state.notifier {
        match notifier.send_verdict(&payload, &product, &verdict).await {
            Ok(()) => state.stats.record_delivery(true),
            Err(e) => {
                state.stats.record_delivery(false);
                warn!(product = %product.name, "Failed to deliver verdict: {}", e);
            }
        }
    }

    verdict
}
