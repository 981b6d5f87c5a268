//! Chunked, time-bounded history retrieval.

use futures_util::stream::{self, StreamExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::services::SeriesStore;
use crate::sources::{HistoryBatch, MarketDataProvider};
use crate::types::{Fundamentals, Series};

/// Series shorter than this are dropped as insufficient history.
pub const MIN_SERIES_BARS: usize = 5;

/// Why a chunk (or single-symbol fetch) produced nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchFailure {
    Upstream(String),
    Timeout(Duration),
    Empty,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::Upstream(e) => write!(f, "upstream error: {}", e),
            FetchFailure::Timeout(d) => write!(f, "timed out after {}s", d.as_secs()),
            FetchFailure::Empty => f.write_str("empty response"),
        }
    }
}

/// Result of one upstream call for one chunk.
#[derive(Debug)]
pub enum ChunkOutcome {
    Fetched(HistoryBatch),
    Failed(FetchFailure),
}

/// Retrieves history for symbol lists in fixed-size chunks.
///
/// Chunks are fetched concurrently up to `max_concurrency`, each under its
/// own timeout. A failed chunk is logged and skipped; it never fails the
/// batch.
pub struct BatchFetcher {
    provider: Arc<dyn MarketDataProvider>,
    max_concurrency: usize,
    timeout: Duration,
}

impl BatchFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>, max_concurrency: usize, timeout: Duration) -> Self {
        Self {
            provider,
            max_concurrency: max_concurrency.max(1),
            timeout,
        }
    }

    /// Fetch `symbols` in chunks of at most `chunk_size`.
    ///
    /// The returned store only contains symbols with at least
    /// [`MIN_SERIES_BARS`] bars, in request order.
    pub async fn fetch_batch(
        &self,
        symbols: &[String],
        period: &str,
        interval: &str,
        chunk_size: usize,
    ) -> SeriesStore {
        let chunks: Vec<&[String]> = symbols.chunks(chunk_size.max(1)).collect();
        debug!(
            "Fetching {} symbols ({}/{}) in {} chunks via {}",
            symbols.len(),
            period,
            interval,
            chunks.len(),
            self.provider.name()
        );

        let requests: Vec<_> = chunks
            .iter()
            .map(|chunk| self.fetch_chunk(chunk, period, interval))
            .collect();
        let outcomes: Vec<ChunkOutcome> = stream::iter(requests)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut store = SeriesStore::new();
        let mut failed = 0;
        for (idx, (chunk, outcome)) in chunks.iter().zip(outcomes).enumerate() {
            let mut batch = match outcome {
                ChunkOutcome::Fetched(batch) => batch,
                ChunkOutcome::Failed(reason) => {
                    warn!("Skipping chunk {} ({} symbols): {}", idx, chunk.len(), reason);
                    failed += 1;
                    continue;
                }
            };

            for symbol in chunk.iter() {
                let Some(bars) = batch.remove(symbol) else {
                    debug!("No data for {} in chunk {}", symbol, idx);
                    continue;
                };
                let series = Series::new(bars);
                if series.len() < MIN_SERIES_BARS {
                    debug!("Dropping {}: only {} bars", symbol, series.len());
                    continue;
                }
                store.insert(symbol.clone(), series);
            }
        }

        info!(
            "Fetched {}/{} symbols ({} of {} chunks failed)",
            store.len(),
            symbols.len(),
            failed,
            chunks.len()
        );
        store
    }

    async fn fetch_chunk(&self, chunk: &[String], period: &str, interval: &str) -> ChunkOutcome {
        let call = self.provider.fetch_history(chunk, period, interval);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(batch)) if batch.is_empty() => ChunkOutcome::Failed(FetchFailure::Empty),
            Ok(Ok(batch)) => ChunkOutcome::Fetched(batch),
            Ok(Err(e)) => ChunkOutcome::Failed(FetchFailure::Upstream(e.to_string())),
            Err(_) => ChunkOutcome::Failed(FetchFailure::Timeout(self.timeout)),
        }
    }

    /// Fetch fundamentals for each symbol; failures and empty payloads are
    /// dropped. Output follows request order.
    pub async fn fetch_fundamentals(&self, symbols: &[String]) -> Vec<(String, Fundamentals)> {
        let requests: Vec<_> = symbols
            .iter()
            .map(|symbol| self.fetch_symbol_fundamentals(symbol))
            .collect();
        let results: Vec<Option<(String, Fundamentals)>> = stream::iter(requests)
            .buffered(self.max_concurrency)
            .collect()
            .await;
        let fetched: Vec<(String, Fundamentals)> = results.into_iter().flatten().collect();

        info!("Fetched fundamentals for {}/{} symbols", fetched.len(), symbols.len());
        fetched
    }

    async fn fetch_symbol_fundamentals(&self, symbol: &str) -> Option<(String, Fundamentals)> {
        let call = self.provider.fetch_fundamentals(symbol);
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(f)) if f.is_empty() => {
                debug!("Empty fundamentals for {}", symbol);
                None
            }
            Ok(Ok(f)) => Some((symbol.to_string(), f)),
            Ok(Err(e)) => {
                warn!("Fundamentals fetch failed for {}: {}", symbol, e);
                None
            }
            Err(_) => {
                warn!(
                    "Fundamentals fetch for {}: {}",
                    symbol,
                    FetchFailure::Timeout(self.timeout)
                );
                None
            }
        }
    }
}
