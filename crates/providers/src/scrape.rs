//! Headless-browser fallback for sold-listing prices.
//!
//! Drives real Chrome through WebDriver against the sold/completed search
//! results page and reads prices out of the rendered DOM. An order of
//! magnitude slower than the Finding API, so the aggregator only hands this
//! source the most specific queries.

use crate::{ProviderError, ResaleSource};
use async_trait::async_trait;
use flipwatch_core::{Currency, Money};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;
use tracing::{debug, warn};
use url::Url;

/// Price texts as they render in listing results: "£12.50", "$1,299.99".
static PRICE_PATTERNS: LazyLock<Vec<(Currency, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Currency::GBP,
            Regex::new(r"£\s*([\d,]+(?:\.\d{1,2})?)").unwrap(),
        ),
        (
            Currency::USD,
            Regex::new(r"\$\s*([\d,]+(?:\.\d{1,2})?)").unwrap(),
        ),
        (
            Currency::EUR,
            Regex::new(r"€\s*([\d,]+(?:\.\d{1,2})?)").unwrap(),
        ),
    ]
});

/// Scraping behavior settings.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// WebDriver endpoint (chromedriver).
    pub webdriver_url: String,
    /// Sold-listings search page; the query lands in `_nkw`.
    pub results_url: String,
    /// CSS selector for result price elements.
    pub price_selector: String,
    /// Scraped amounts at or outside (min, max) are listing noise.
    pub min_price: f64,
    pub max_price: f64,
    /// Extra settle time after the page body appears.
    pub render_wait_secs: u64,
    pub page_load_timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            results_url: "https://www.ebay.co.uk/sch/i.html".to_string(),
            price_selector: ".s-item__price".to_string(),
            min_price: 0.5,
            max_price: 10_000.0,
            render_wait_secs: 2,
            page_load_timeout_secs: 15,
        }
    }
}

/// Sold-price lookup through a rendered search results page.
pub struct ScrapeSource {
    config: ScrapeConfig,
}

impl ScrapeSource {
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    fn search_url(&self, query: &str) -> Result<Url, ProviderError> {
        let url = Url::parse_with_params(
            &self.config.results_url,
            &[("_nkw", query), ("LH_Sold", "1"), ("LH_Complete", "1")],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl ResaleSource for ScrapeSource {
    fn name(&self) -> &'static str {
        "ebay-scrape"
    }

    async fn try_fetch(&self, query: &str) -> Result<Vec<Money>, ProviderError> {
        let url = self.search_url(query)?;

        let mut caps = DesiredCapabilities::chrome();
        caps.add_chrome_option(
            "args",
            vec![
                "--headless=new",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--window-size=1920,1080",
                "--disable-blink-features=AutomationControlled",
            ],
        )?;

        let driver = WebDriver::new(&self.config.webdriver_url, caps).await?;

        // Everything fallible runs inside this scope so the quit() below is
        // reached on every path.
        let outcome: Result<String, WebDriverError> = async {
            driver
                .set_page_load_timeout(Duration::from_secs(self.config.page_load_timeout_secs))
                .await?;
            driver.goto(url.as_str()).await?;
            driver.query(By::Tag("body")).first().await?;
            tokio::time::sleep(Duration::from_secs(self.config.render_wait_secs)).await;
            driver.source().await
        }
        .await;

        if let Err(e) = driver.quit().await {
            warn!("Failed to close browser session: {}", e);
        }

        let page = outcome?;
        let prices = parse_result_prices(&page, &self.config);
        debug!(query = query, count = prices.len(), "Scraped sold prices");
        Ok(prices)
    }
}

/// Parse price texts out of rendered results HTML.
///
/// Pure and synchronous: `scraper::Html` is not `Send`, so the document
/// must never live across an await.
fn parse_result_prices(html: &str, config: &ScrapeConfig) -> Vec<Money> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(&config.price_selector) {
        Ok(selector) => selector,
        Err(e) => {
            warn!("Invalid price selector {:?}: {}", config.price_selector, e);
            return Vec::new();
        }
    };

    let mut prices = Vec::new();
    for element in document.select(&selector) {
        let text = element.text().collect::<Vec<_>>().join(" ");
        if let Some(price) = parse_price_text(&text) {
            if price.amount > config.min_price && price.amount < config.max_price {
                prices.push(price);
            }
        }
    }
    prices
}

/// First recognizable price in a text. Ranges like "£12.50 to £20.00"
/// yield the lower bound.
fn parse_price_text(text: &str) -> Option<Money> {
    for (currency, pattern) in PRICE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let Ok(amount) = caps[1].replace(',', "").parse::<f64>() {
                return Some(Money::new(amount, *currency));
            }
        }
    }
    None
}
