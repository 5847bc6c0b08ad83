//! Verdict rendering and webhook delivery.

use crate::webhook::{
    Embed, EmbedField, EmbedFooter, EmbedImage, EmbedThumbnail, WebhookMessage, COLOR_LOSS,
    COLOR_NO_DATA, COLOR_PROFIT,
};
use flipwatch_core::{AlertPayload, NormalizedProduct, ProfitTier, Verdict};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Bare URLs inside alert field text.
static URLS_IN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s\])>]+").unwrap());

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Webhook request failed: {0}")]
    Request(String),
    #[error("Webhook rejected the message: HTTP {0}")]
    Rejected(u16),
    #[error("Webhook URL is not configured")]
    MissingWebhook,
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        NotifierError::Request(err.to_string())
    }
}

/// Configuration for webhook delivery.
#[derive(Clone)]
pub struct NotifierConfig {
    /// Discord webhook endpoint.
    pub webhook_url: String,
    /// Username the message posts under.
    pub username: String,
    /// Optional mention (a role or user ping) prepended to the headline.
    pub mention: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Cap on rendered links per message.
    pub max_links: usize,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("webhook_url", &"***")
            .field("username", &self.username)
            .field("mention", &self.mention)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_links", &self.max_links)
            .finish()
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            username: "flipwatch".to_string(),
            mention: None,
            timeout_secs: 10,
            max_links: 6,
        }
    }
}

impl NotifierConfig {
    /// Build from `DISCORD_WEBHOOK_URL` and `DISCORD_MENTION`.
    ///
    /// Returns `None` when no webhook is configured, which disables delivery.
    pub fn from_env() -> Option<Self> {
        let webhook_url = std::env::var("DISCORD_WEBHOOK_URL").ok()?;
        if webhook_url.is_empty() {
            return None;
        }
        let mention = std::env::var("DISCORD_MENTION")
            .ok()
            .filter(|m| !m.is_empty());
        Some(Self {
            webhook_url,
            mention,
            ..Default::default()
        })
    }
}

/// Posts one rendered verdict per alert to the configured webhook.
pub struct VerdictNotifier {
    config: NotifierConfig,
    client: reqwest::Client,
}

impl VerdictNotifier {
    pub fn new(config: NotifierConfig) -> Result<Self, NotifierError> {
        if config.webhook_url.is_empty() {
            return Err(NotifierError::MissingWebhook);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    /// Render and deliver one verdict.
    pub async fn send_verdict(
        &self,
        payload: &AlertPayload,
        product: &NormalizedProduct,
        verdict: &Verdict,
    ) -> Result<(), NotifierError> {
        let message = build_message(&self.config, payload, product, verdict);
        debug!(product = %product.name, tier = %verdict.tier, "Delivering verdict");

        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifierError::Rejected(response.status().as_u16()));
        }

        info!(product = %product.name, tier = %verdict.tier, "Verdict delivered");
        Ok(())
    }
}

/// Render a verdict as a webhook message.
///
/// Pure so that every outcome shape can be asserted on without a live
/// webhook. Delivery state lives in [`VerdictNotifier`].
pub fn build_message(
    config: &NotifierConfig,
    payload: &AlertPayload,
    product: &NormalizedProduct,
    verdict: &Verdict,
) -> WebhookMessage {
    let headline = headline(verdict.tier);
    let content = match &config.mention {
        Some(mention) => format!("{mention} {headline}"),
        None => headline.to_string(),
    };

    let mut fields = vec![outcome_field(verdict), price_analysis_field(verdict)];
    if let Some(info) = product_info_field(payload) {
        fields.push(info);
    }
    if let Some(links) = links_field(config, payload, product) {
        fields.push(links);
    }

    let embed = Embed {
        title: format!("💰 {}", product.name),
        description: None,
        url: payload.url.clone(),
        color: outcome_color(verdict),
        timestamp: Some(chrono::Utc::now().to_rfc3339()),
        footer: Some(EmbedFooter {
            text: footer_text(payload, verdict),
        }),
        thumbnail: payload
            .thumbnail_url
            .clone()
            .map(|url| EmbedThumbnail { url }),
        image: payload.image_url.clone().map(|url| EmbedImage { url }),
        fields,
    };

    WebhookMessage {
        content: Some(content),
        username: Some(config.username.clone()),
        embeds: vec![embed],
    }
}

fn headline(tier: ProfitTier) -> &'static str {
    match tier {
        ProfitTier::HighProfit => "🔥 **HIGH PROFIT DEAL!** 🔥",
        ProfitTier::Profitable => "🚨 **New Deal Alert!**",
        ProfitTier::SmallProfit => "💼 **Deal Detected**",
        ProfitTier::LowOrNoProfit => "ℹ️ **Product Alert** (Low Margin)",
        ProfitTier::NoData => "ℹ️ **Product Alert** (Research Required)",
    }
}

fn outcome_color(verdict: &Verdict) -> u32 {
    match verdict.tier {
        ProfitTier::NoData => COLOR_NO_DATA,
        ProfitTier::LowOrNoProfit => COLOR_LOSS,
        _ => COLOR_PROFIT,
    }
}

/// Lead field: profit estimate, low-margin notice, or research prompt.
fn outcome_field(verdict: &Verdict) -> EmbedField {
    match (&verdict.resale, verdict.tier) {
        (None, _) => EmbedField::new(
            "❓ NO RESALE DATA",
            "Could not find recent sold listings. Research required!",
            false,
        ),
        (Some(summary), ProfitTier::LowOrNoProfit) => EmbedField::new(
            "⚠️ LOW PROFIT MARGIN",
            format!(
                "📉 **£{:.2}** ({:.1}%)\n*Based on {} recent sold listings*",
                verdict.profit, verdict.profit_percent, summary.count
            ),
            false,
        ),
        (Some(summary), tier) => {
            let marker = profit_marker(tier, verdict.profit);
            EmbedField::new(
                "🎯 ESTIMATED PROFIT",
                format!(
                    "{marker} **£{:.2}** profit ({:.1}%)\n*Based on {} recent sold listings*",
                    verdict.profit, verdict.profit_percent, summary.count
                ),
                false,
            )
        }
    }
}

/// Colored dot next to the profit figure.
fn profit_marker(tier: ProfitTier, profit: f64) -> &'static str {
    match tier {
        ProfitTier::HighProfit | ProfitTier::Profitable => "🟢",
        _ if profit > 10.0 => "🟡",
        _ => "🔵",
    }
}

fn price_analysis_field(verdict: &Verdict) -> EmbedField {
    let buy_line = if verdict.purchase_observed {
        format!("🏷️ **Buy Price:** {}", verdict.purchase)
    } else {
        "🏷️ **Buy Price:** not listed".to_string()
    };

    let value = match &verdict.resale {
        Some(summary) => format!(
            "{buy_line}\n📈 **Median Sold:** £{:.2}\n📊 **Average Sold:** £{:.2}\n↕️ **Range:** £{:.2}-£{:.2}",
            summary.median, summary.mean, summary.min, summary.max
        ),
        None => format!("{buy_line}\n❌ **Resell Data:** Not available"),
    };

    EmbedField::new("📊 Price Analysis", value, false)
}

/// Stock and status details passed through from the source alert.
fn product_info_field(payload: &AlertPayload) -> Option<EmbedField> {
    let mut lines = Vec::new();
    for field in &payload.fields {
        let name = field.name.to_lowercase();
        if name.contains("status") || name.contains("stock") {
            lines.push(format!("**{}:** {}", field.name, field.value));
        }
    }
    if lines.is_empty() {
        return None;
    }
    Some(EmbedField::new("📦 Product Info", lines.join("\n"), false))
}

/// Links from the alert plus a generated sold-listings search.
fn links_field(
    config: &NotifierConfig,
    payload: &AlertPayload,
    product: &NormalizedProduct,
) -> Option<EmbedField> {
    let mut links: Vec<String> = Vec::new();

    for field in &payload.fields {
        if !field.name.to_lowercase().contains("link") {
            continue;
        }
        for found in URLS_IN_TEXT.find_iter(&field.value) {
            links.push(found.as_str().to_string());
        }
    }

    if product.is_known() {
        if let Some(sold_search) = sold_listings_url(&product.name) {
            links.push(format!("[eBay sold listings]({sold_search})"));
        }
    }

    if links.is_empty() {
        return None;
    }
    links.truncate(config.max_links);
    Some(EmbedField::new("🔗 Links", links.join("\n"), false))
}

/// Completed-and-sold search for the product on the resale marketplace.
fn sold_listings_url(name: &str) -> Option<Url> {
    Url::parse_with_params(
        "https://www.ebay.co.uk/sch/i.html",
        &[("_nkw", name), ("LH_Sold", "1"), ("LH_Complete", "1")],
    )
    .ok()
}

fn footer_text(payload: &AlertPayload, verdict: &Verdict) -> String {
    let author = payload.author.as_deref().unwrap_or("flipwatch");
    match &verdict.resale {
        Some(summary) => format!("{author} | Data from {} sold listings", summary.count),
        None => author.to_string(),
    }
}
