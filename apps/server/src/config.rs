//! Application configuration.

use flipwatch_alerts::NotifierConfig;
use flipwatch_pipeline::ProfitPolicy;
use flipwatch_providers::{EbayFindingConfig, ScrapeConfig};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// eBay Finding API configuration.
    pub ebay: EbaySettings,
    /// Headless-browser fallback configuration.
    pub scrape: ScrapeSettings,
    /// Discord delivery configuration.
    pub notify: NotifySettings,
    /// Profitability thresholds.
    pub profit: ProfitSettings,
    /// Address the ingest server binds to.
    pub bind_addr: String,
    /// Seconds between exchange rate refreshes.
    pub rates_refresh_secs: u64,
    /// Process alerts without delivering webhooks.
    pub dry_run: bool,
    /// Logging level.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ebay: EbaySettings::default(),
            scrape: ScrapeSettings::default(),
            notify: NotifySettings::default(),
            profit: ProfitSettings::default(),
            bind_addr: "0.0.0.0:8080".to_string(),
            rates_refresh_secs: 300,
            dry_run: false,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(addr) = env_var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(app_id) = env_var("EBAY_APP_ID") {
            config.ebay.app_id = app_id;
        }
        if let Some(global_id) = env_var("EBAY_GLOBAL_ID") {
            config.ebay.global_id = global_id;
        }
        config.scrape.enabled = env_flag("SCRAPE_ENABLED", config.scrape.enabled);
        if let Some(url) = env_var("WEBDRIVER_URL") {
            config.scrape.webdriver_url = url;
        }
        if let Some(url) = env_var("DISCORD_WEBHOOK_URL") {
            config.notify.webhook_url = url;
        }
        if let Some(mention) = env_var("DISCORD_MENTION") {
            config.notify.mention = Some(mention);
        }

        config
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}

/// eBay Finding API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EbaySettings {
    /// Application ID. Empty disables the source.
    pub app_id: String,
    /// Marketplace identifier.
    pub global_id: String,
    /// Completed listings requested per query.
    pub page_size: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EbaySettings {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            global_id: "EBAY-GB".to_string(),
            page_size: 10,
            timeout_secs: 10,
        }
    }
}

impl From<&EbaySettings> for EbayFindingConfig {
    fn from(settings: &EbaySettings) -> Self {
        EbayFindingConfig {
            app_id: settings.app_id.clone(),
            global_id: settings.global_id.clone(),
            page_size: settings.page_size,
            timeout_secs: settings.timeout_secs,
            ..Default::default()
        }
    }
}

/// Headless-browser fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSettings {
    /// Whether the fallback source is wired in.
    pub enabled: bool,
    /// WebDriver endpoint.
    pub webdriver_url: String,
    /// Plausible scraped price bounds in GBP.
    pub min_price: f64,
    pub max_price: f64,
    /// Most-specific queries the fallback may try per alert.
    pub query_limit: usize,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            webdriver_url: "http://localhost:9515".to_string(),
            min_price: 0.5,
            max_price: 10_000.0,
            query_limit: 2,
        }
    }
}

impl From<&ScrapeSettings> for ScrapeConfig {
    fn from(settings: &ScrapeSettings) -> Self {
        ScrapeConfig {
            webdriver_url: settings.webdriver_url.clone(),
            min_price: settings.min_price,
            max_price: settings.max_price,
            ..Default::default()
        }
    }
}

/// Discord delivery settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifySettings {
    /// Webhook endpoint. Empty disables delivery.
    pub webhook_url: String,
    /// Optional mention prepended to each message.
    pub mention: Option<String>,
}

impl From<&NotifySettings> for NotifierConfig {
    fn from(settings: &NotifySettings) -> Self {
        NotifierConfig {
            webhook_url: settings.webhook_url.clone(),
            mention: settings.mention.clone(),
            ..Default::default()
        }
    }
}

/// Profitability thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitSettings {
    /// Estimated profit above this is a high-profit deal.
    pub high_profit_gbp: f64,
    /// Estimated profit above this is worth buying.
    pub profitable_gbp: f64,
}

impl Default for ProfitSettings {
    fn default() -> Self {
        Self {
            high_profit_gbp: 50.0,
            profitable_gbp: 20.0,
        }
    }
}

impl From<&ProfitSettings> for ProfitPolicy {
    fn from(settings: &ProfitSettings) -> Self {
        ProfitPolicy {
            high_profit_gbp: settings.high_profit_gbp,
            profitable_gbp: settings.profitable_gbp,
        }
    }
}
