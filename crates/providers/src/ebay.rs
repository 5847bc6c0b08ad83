//! eBay Finding API client for completed-listing prices.

use crate::{ProviderError, ResaleSource};
use async_trait::async_trait;
use flipwatch_core::{Currency, Money};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Finding API access settings.
#[derive(Clone)]
pub struct EbayFindingConfig {
    /// Application ID (SECURITY-APPNAME). Empty disables the source.
    pub app_id: String,
    pub endpoint: String,
    /// Marketplace to search; EBAY-GB resolves converted prices in GBP.
    pub global_id: String,
    /// Completed listings requested per query.
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for EbayFindingConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            endpoint: "https://svcs.ebay.com/services/search/FindingService/v1".to_string(),
            global_id: "EBAY-GB".to_string(),
            page_size: 10,
            timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for EbayFindingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EbayFindingConfig")
            .field("app_id", &"***")
            .field("endpoint", &self.endpoint)
            .field("global_id", &self.global_id)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Sold-price lookup against the eBay Finding API.
pub struct EbayFindingSource {
    config: EbayFindingConfig,
    client: reqwest::Client,
}

impl EbayFindingSource {
    pub fn new(config: EbayFindingConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl ResaleSource for EbayFindingSource {
    fn name(&self) -> &'static str {
        "ebay-finding"
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<Money>, ProviderError> {
        let page_size = self.config.page_size.to_string();
        let params: [(&str, &str); 13] = [
            ("OPERATION-NAME", "findCompletedItems"),
            ("SERVICE-VERSION", "1.0.0"),
            ("SECURITY-APPNAME", self.config.app_id.as_str()),
            ("GLOBAL-ID", self.config.global_id.as_str()),
            ("RESPONSE-DATA-FORMAT", "JSON"),
            ("REST-PAYLOAD", ""),
            ("keywords", query),
            ("itemFilter(0).name", "SoldItemsOnly"),
            ("itemFilter(0).value", "true"),
            ("itemFilter(1).name", "ListingType"),
            ("itemFilter(1).value", "FixedPrice"),
            ("sortOrder", "EndTimeSoonest"),
            ("paginationInput.entriesPerPage", page_size.as_str()),
        ];

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "HTTP {} from Finding API",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_completed_items(&body)
    }
}

/// Pull sold prices out of a Finding API response.
///
/// A non-success ack is surfaced as an API error carrying the endpoint's
/// own message. Individually malformed items are skipped.
fn parse_completed_items(body: &Value) -> Result<Vec<Money>, ProviderError> {
    let response = &body["findCompletedItemsResponse"][0];
    if response.is_null() {
        return Err(ProviderError::ParseError(
            "missing findCompletedItemsResponse".to_string(),
        ));
    }

    let ack = response["ack"][0].as_str().unwrap_or_default();
    if ack != "Success" && ack != "Warning" {
        let message = response["errorMessage"][0]["error"][0]["message"][0]
            .as_str()
            .unwrap_or("unknown error");
        return Err(ProviderError::ApiError(message.to_string()));
    }

    let mut prices = Vec::new();
    let Some(items) = response["searchResult"][0]["item"].as_array() else {
        debug!("Finding API returned no items");
        return Ok(prices);
    };

    for item in items {
        let sold = &item["sellingStatus"][0]["convertedCurrentPrice"][0];
        let amount = sold["__value__"]
            .as_str()
            .and_then(|raw| raw.parse::<f64>().ok())
            .or_else(|| sold["__value__"].as_f64())
            .unwrap_or(0.0);
        if amount <= 0.0 {
            continue;
        }
        let currency = sold["@currencyId"]
            .as_str()
            .and_then(Currency::from_code)
            .unwrap_or_default();
        prices.push(Money::new(amount, currency));
    }

    Ok(prices)
}
