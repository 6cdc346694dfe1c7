//! Price source trait definition.

use crate::error::DataError;
use crate::types::PriceBar;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily price sources.
///
/// Retrieval finishes before the engine sees any data; the engine itself
/// never performs I/O.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily bars for `symbol` over the inclusive range `[start, end]`.
    ///
    /// # Returns
    /// Bars ordered from oldest to newest, one per date
    async fn fetch_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
