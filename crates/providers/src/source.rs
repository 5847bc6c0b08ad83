//! The uniform interface resale sources implement.

use crate::ProviderError;
use async_trait::async_trait;
use flipwatch_core::Money;

/// Trait for places sold prices can come from.
///
/// An `Ok` with an empty vector means the search worked and found nothing
/// usable, which is not a failure; `Err` means the attempt itself failed.
/// The aggregator treats the two differently only in log output: both move
/// the scan along to the next query or source.
#[async_trait]
pub trait ResaleSource: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Attempt one query against this source.
    async fn try_fetch(&self, query: &str) -> Result<Vec<Money>, ProviderError>;
}
