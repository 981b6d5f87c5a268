//! Upstream market-data abstraction.
//!
//! The scanner only ever needs two things from a data vendor: OHLCV history
//! for a group of symbols and a metadata snapshot for a single symbol. Both
//! are best-effort; callers treat any error as "no data".

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::types::{Fundamentals, OhlcPoint};

/// Raw per-symbol bars as returned by a provider, before validation.
pub type HistoryBatch = HashMap<String, Vec<OhlcPoint>>;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &'static str;

    /// Fetch history for a group of symbols in one logical request.
    ///
    /// An `Err` means the whole group failed. Symbols missing from an `Ok`
    /// map had no usable data.
    async fn fetch_history(
        &self,
        symbols: &[String],
        period: &str,
        interval: &str,
    ) -> Result<HistoryBatch>;

    /// Fetch fundamentals for one symbol.
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals>;
}
