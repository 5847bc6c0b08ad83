//! Source-by-source, query-by-query resale lookup with short-circuit.

use crate::{ProviderError, ResaleSource};
use flipwatch_core::{PriceSample, RateTable, ResaleSummary};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

struct SourceEntry {
    source: Box<dyn ResaleSource>,
    /// Cap on how many queries this source sees (None = all of them).
    query_limit: Option<usize>,
}

/// Fold-until-success over registered sources and generated queries.
///
/// Sources are consulted in registration order, each walking the query
/// ladder from most to least specific. The first attempt yielding at least
/// one usable sample ends the whole lookup; failures are logged and
/// skipped and never escalate past this stage.
pub struct ResaleAggregator {
    sources: Vec<SourceEntry>,
    running: Option<Arc<AtomicBool>>,
}

impl ResaleAggregator {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            running: None,
        }
    }

    /// Register a source that sees every query.
    pub fn with_source(mut self, source: impl ResaleSource + 'static) -> Self {
        self.sources.push(SourceEntry {
            source: Box::new(source),
            query_limit: None,
        });
        self
    }

    /// Register a source that only sees the first `query_limit` (most
    /// specific) queries. Used for expensive fallbacks.
    pub fn with_limited_source(
        mut self,
        source: impl ResaleSource + 'static,
        query_limit: usize,
    ) -> Self {
        self.sources.push(SourceEntry {
            source: Box::new(source),
            query_limit: Some(query_limit),
        });
        self
    }

    /// Honor this running flag: once it reads false, no further network
    /// attempts are started.
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    fn shutting_down(&self) -> bool {
        self.running
            .as_ref()
            .map(|flag| !flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Look up resale comparables for the generated queries.
    ///
    /// `None` means every attempt came back empty or failed, which
    /// downstream reads as a NoData verdict rather than an error.
    pub async fn aggregate(&self, queries: &[String], rates: &RateTable) -> Option<ResaleSummary> {
        for entry in &self.sources {
            let limit = entry.query_limit.unwrap_or(queries.len());
            for query in queries.iter().take(limit) {
                if self.shutting_down() {
                    debug!(
                        source = entry.source.name(),
                        "Abandoning resale lookup: shutting down"
                    );
                    return None;
                }

                match entry.source.try_fetch(query).await {
                    Ok(prices) if !prices.is_empty() => {
                        let samples: Vec<PriceSample> = prices
                            .into_iter()
                            .map(|price| PriceSample::new(price, query.clone()))
                            .collect();
                        match ResaleSummary::from_samples(&samples, rates) {
                            Some(summary) => {
                                info!(
                                    source = entry.source.name(),
                                    query = %query,
                                    count = summary.count,
                                    median = summary.median,
                                    "Resale comparables found"
                                );
                                return Some(summary);
                            }
                            None => {
                                // Every sample was non-positive after conversion.
                                debug!(
                                    source = entry.source.name(),
                                    query = %query,
                                    "No usable samples"
                                );
                            }
                        }
                    }
                    Ok(_) => {
                        debug!(
                            source = entry.source.name(),
                            query = %query,
                            "No comparables for query"
                        );
                    }
                    Err(e) if e.is_transient() => {
                        debug!(
                            source = entry.source.name(),
                            query = %query,
                            error = %e,
                            "Attempt failed, trying next"
                        );
                    }
                    Err(e) => {
                        warn!(
                            source = entry.source.name(),
                            query = %query,
                            error = %e,
                            "Attempt failed, trying next"
                        );
                    }
                }
            }
        }
        None
    }
}

impl Default for ResaleAggregator {
    fn default() -> Self {
        Self::new()
    }
}
