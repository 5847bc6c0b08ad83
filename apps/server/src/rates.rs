//! GBP exchange rate fetching.
//!
//! Pulls current rates from a public API for converting USD and EUR deal
//! prices into GBP.

use crate::state::SharedState;
use flipwatch_core::RateTable;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

/// Fetch the current rate table from the exchange rate API.
pub async fn fetch_rate_table() -> Result<RateTable, Box<dyn std::error::Error + Send + Sync>> {
    let url = "https://open.er-api.com/v6/latest/GBP";

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let response: Value = client.get(url).send().await?.json().await?;
    parse_rate_table(&response)
}

/// The API reports units per GBP; the table stores GBP per unit, so both
/// rates are inverted on the way in.
fn parse_rate_table(response: &Value) -> Result<RateTable, Box<dyn std::error::Error + Send + Sync>> {
    let usd = response["rates"]["USD"]
        .as_f64()
        .ok_or("USD rate not found in response")?;
    let eur = response["rates"]["EUR"]
        .as_f64()
        .ok_or("EUR rate not found in response")?;

    if usd <= 0.0 || eur <= 0.0 {
        return Err(format!("non-positive rates in response: USD {usd}, EUR {eur}").into());
    }

    Ok(RateTable::new(1.0 / usd, 1.0 / eur))
}

/// Run the exchange rate refresh loop.
///
/// A failed refresh keeps the previous table. The sleep checks the running
/// flag once a second so shutdown is not held up for a full interval.
pub async fn run_rate_updater(state: SharedState) {
    info!("Starting exchange rate updater");

    loop {
        match fetch_rate_table().await {
            Ok(table) => {
                state.rates.replace(table);
                let current = state.rates.current();
                info!(
                    version = current.version,
                    usd = current.usd,
                    eur = current.eur,
                    "Updated exchange rates"
                );
            }
            Err(e) => {
                warn!("Failed to fetch exchange rates, keeping previous table: {}", e);
            }
        }

        for _ in 0..state.config.rates_refresh_secs {
            if !state.is_running() {
                info!("Exchange rate updater stopped");
                return;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}
