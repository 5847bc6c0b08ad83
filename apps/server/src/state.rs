//! Application state management.

use crate::config::AppConfig;
use flipwatch_alerts::VerdictNotifier;
use flipwatch_core::SharedRates;
use flipwatch_pipeline::{ProfitPolicy, QueryPolicy};
use flipwatch_providers::{EbayFindingSource, ResaleAggregator, ScrapeSource};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Counters for the pipeline.
#[derive(Debug, Default)]
pub struct PipelineStats {
    /// Alerts accepted for processing.
    pub alerts_received: AtomicU64,
    /// Verdicts produced, delivered or not.
    pub verdicts_produced: AtomicU64,
    /// Verdicts with no resale data behind them.
    pub no_data_verdicts: AtomicU64,
    /// Webhook messages delivered.
    pub notifications_sent: AtomicU64,
    /// Webhook deliveries that failed.
    pub delivery_failures: AtomicU64,
    /// Start time in milliseconds.
    pub started_at_ms: AtomicU64,
}

impl PipelineStats {
    pub fn new() -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        Self {
            started_at_ms: AtomicU64::new(now),
            ..Default::default()
        }
    }

    pub fn record_received(&self) {
        self.alerts_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verdict(&self, no_data: bool) {
        self.verdicts_produced.fetch_add(1, Ordering::Relaxed);
        if no_data {
            self.no_data_verdicts.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_delivery(&self, delivered: bool) {
        if delivered {
            self.notifications_sent.fetch_add(1, Ordering::Relaxed);
        } else {
            self.delivery_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        (now - self.started_at_ms.load(Ordering::Relaxed)) / 1000
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            alerts_received: self.alerts_received.load(Ordering::Relaxed),
            verdicts_produced: self.verdicts_produced.load(Ordering::Relaxed),
            no_data_verdicts: self.no_data_verdicts.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            uptime_secs: self.uptime_secs(),
        }
    }
}

/// Snapshot of the pipeline counters.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub alerts_received: u64,
    pub verdicts_produced: u64,
    pub no_data_verdicts: u64,
    pub notifications_sent: u64,
    pub delivery_failures: u64,
    pub uptime_secs: u64,
}

/// Application state shared across handlers and workers.
pub struct AppState {
    /// Configuration.
    pub config: AppConfig,
    /// Current exchange rates.
    pub rates: SharedRates,
    /// Resale sources in priority order.
    pub aggregator: ResaleAggregator,
    /// Webhook delivery, when configured.
    pub notifier: Option<VerdictNotifier>,
    /// Query generation knobs.
    pub query_policy: QueryPolicy,
    /// Profit thresholds.
    pub profit_policy: ProfitPolicy,
    /// Pipeline statistics.
    pub stats: PipelineStats,
    /// Running flag, shared with the aggregator.
    pub running: Arc<AtomicBool>,
}

impl AppState {
    /// Start the pipeline.
    pub fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    /// Stop the pipeline. In-flight research stops at the next source
    /// boundary because the aggregator holds the same flag.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get statistics summary.
    pub fn stats_summary(&self) -> StatsSummary {
        self.stats.summary()
    }
}

/// Shared state handle.
pub type SharedState = Arc<AppState>;

/// Create shared state, wiring resale sources from the configuration.
pub fn create_state(config: AppConfig) -> SharedState {
    let running = Arc::new(AtomicBool::new(false));

    let mut aggregator = ResaleAggregator::new().with_running_flag(running.clone());

    if config.ebay.app_id.is_empty() {
        info!("eBay Finding source disabled (EBAY_APP_ID not set)");
    } else {
        match EbayFindingSource::new((&config.ebay).into()) {
            Ok(source) => aggregator = aggregator.with_source(source),
            Err(e) => warn!("eBay Finding source unavailable: {}", e),
        }
    }

    if config.scrape.enabled {
        let source = ScrapeSource::new((&config.scrape).into());
        aggregator = aggregator.with_limited_source(source, config.scrape.query_limit);
    }

    let notifier = if config.dry_run {
        info!("Dry run: webhook delivery disabled");
        None
    } else if config.notify.webhook_url.is_empty() {
        info!("Discord delivery disabled (DISCORD_WEBHOOK_URL not set)");
        None
    } else {
        match VerdictNotifier::new((&config.notify).into()) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                warn!("Discord delivery unavailable: {}", e);
                None
            }
        }
    };

    let profit_policy = (&config.profit).into();

    Arc::new(AppState {
        rates: SharedRates::default(),
        aggregator,
        notifier,
        query_policy: QueryPolicy::default(),
        profit_policy,
        stats: PipelineStats::new(),
        running,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pipeline_stats_new() {
        let stats = PipelineStats::new();
        assert_eq!(stats.alerts_received.load(Ordering::Relaxed), 0);
        assert!(stats.started_at_ms.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_pipeline_stats_record() {
        let stats = PipelineStats::new();
        stats.record_received();
        stats.record_received();
        assert_eq!(stats.alerts_received.load(Ordering::Relaxed), 2);

        stats.record_verdict(false);
        stats.record_verdict(true);
        assert_eq!(stats.verdicts_produced.load(Ordering::Relaxed), 2);
        assert_eq!(stats.no_data_verdicts.load(Ordering::Relaxed), 1);

        stats.record_delivery(true);
        stats.record_delivery(false);
        assert_eq!(stats.notifications_sent.load(Ordering::Relaxed), 1);
        assert_eq!(stats.delivery_failures.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_stats_summary() {
        let stats = PipelineStats::new();
        stats.record_received();
        stats.record_verdict(true);

        let summary = stats.summary();
        assert_eq!(summary.alerts_received, 1);
        assert_eq!(summary.verdicts_produced, 1);
        assert_eq!(summary.no_data_verdicts, 1);
    }

    #[test]
    fn test_app_state_start_stop() {
        let state = create_state(AppConfig::default());
        assert!(!state.is_running());

        state.start();
        assert!(state.is_running());

        state.stop();
        assert!(!state.is_running());
    }

    #[test]
    fn test_default_config_wires_scrape_only() {
        let state = create_state(AppConfig::default());
        assert_eq!(state.aggregator.source_count(), 1);
        assert!(state.notifier.is_none());
    }

    #[test]
    fn test_ebay_source_wired_when_configured() {
        let mut config = AppConfig::default();
        config.ebay.app_id = "app-123".to_string();
        let state = create_state(config);
        assert_eq!(state.aggregator.source_count(), 2);
    }

    #[test]
    fn test_dry_run_disables_delivery() {
        let mut config = AppConfig::default();
        config.notify.webhook_url = "https://discord.com/api/webhooks/1/token".to_string();
        config.dry_run = true;
        let state = create_state(config);
        assert!(state.notifier.is_none());
    }
}
