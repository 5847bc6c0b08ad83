//! Flipwatch - Headless Server
//!
//! Turns deal alerts into resale profitability verdicts delivered to Discord.

mod config;
mod ingest;
mod rates;
mod state;
mod worker;

use clap::Parser;
use config::AppConfig;
use state::create_state;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Flipwatch CLI
#[derive(Parser, Debug)]
#[command(name = "flipwatch")]
#[command(about = "Resale profitability pipeline for deal alerts", long_about = None)]
struct Args {
    /// Bind address for the ingest server
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Process alerts without delivering webhooks
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// High-profit threshold in GBP
    #[arg(long)]
    high_profit: Option<f64>,

    /// Minimum worthwhile profit in GBP
    #[arg(long)]
    min_profit: Option<f64>,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    let mut config = AppConfig::from_env();
    config.log_level = args.log_level.clone();
    config.dry_run = args.dry_run;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(threshold) = args.high_profit {
        config.profit.high_profit_gbp = threshold;
    }
    if let Some(threshold) = args.min_profit {
        config.profit.profitable_gbp = threshold;
    }

    info!("🚀 Flipwatch starting...");
    info!("  Bind: {}", config.bind_addr);
    info!(
        "  eBay Finding API: {}",
        if config.ebay.app_id.is_empty() { "disabled" } else { "enabled" }
    );
    info!(
        "  Scrape fallback: {}",
        if config.scrape.enabled { "enabled" } else { "disabled" }
    );
    info!(
        "  Discord delivery: {}",
        if config.notify.webhook_url.is_empty() { "disabled" } else { "enabled" }
    );
    info!("  Dry Run: {}", config.dry_run);
    info!(
        "  Profit thresholds: £{:.2} / £{:.2}",
        config.profit.profitable_gbp, config.profit.high_profit_gbp
    );

    // Create shared state
    let state = create_state(config);
    state.start();

    // Fetch initial exchange rates so the first alerts convert correctly
    match rates::fetch_rate_table().await {
        Ok(table) => {
            info!(usd = table.usd, eur = table.eur, "Initial exchange rates fetched");
            state.rates.replace(table);
        }
        Err(e) => {
            warn!("Failed to fetch initial exchange rates, using fallback: {}", e);
        }
    }

    // Start the ingest server
    if let Err(e) = ingest::start_ingest_server(state.clone(), &state.config.bind_addr).await {
        tracing::error!("Failed to start ingest server: {}", e);
        return;
    }

    // Spawn the exchange rate refresh loop
    let rate_state = state.clone();
    let rate_handle = tokio::spawn(async move {
        rates::run_rate_updater(rate_state).await;
    });

    // Handle shutdown
    info!("Press Ctrl+C to stop...");

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for Ctrl+C");

    warn!("Shutdown signal received");
    state.stop();

    // Wait for the updater with timeout; in-flight alert tasks stop at the
    // next source boundary via the shared running flag
    let _ = tokio::time::timeout(Duration::from_secs(2), rate_handle).await;

    // Final stats
    let summary = state.stats_summary();
    info!("📈 Final Stats:");
    info!("  Total uptime: {} seconds", summary.uptime_secs);
    info!("  Alerts received: {}", summary.alerts_received);
    info!("  Verdicts produced: {}", summary.verdicts_produced);
    info!("  No-data verdicts: {}", summary.no_data_verdicts);
    info!("  Notifications sent: {}", summary.notifications_sent);
    info!("  Delivery failures: {}", summary.delivery_failures);

    info!("👋 Flipwatch stopped");
}
