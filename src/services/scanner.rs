//! Scan orchestration: fetch, detect, merge, rank, cache.

use chrono::{DateTime, FixedOffset, Utc};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ScannerConfig;
use crate::error::Result;
use crate::services::signals::{
    BollingerSqueeze, Detector, EmaCrossover, FiftyTwoWeekBreakout, OpeningRangeBreakout,
    QualityValueScore, RsiOversoldBounce, SupertrendEma,
};
use crate::services::{BatchFetcher, Cache, ScanCache, SeriesStore};
use crate::sources::MarketDataProvider;
use crate::types::{ScanResult, ScanType, Signal};
use crate::universe::Universe;

/// Orchestrator lifecycle for one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Fetching,
    Detecting,
    Merging,
    Cached,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanPhase::Idle => "idle",
            ScanPhase::Fetching => "fetching",
            ScanPhase::Detecting => "detecting",
            ScanPhase::Merging => "merging",
            ScanPhase::Cached => "cached",
        };
        f.write_str(s)
    }
}

/// A history fetch over a slice of the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRequest {
    pub start: usize,
    pub end: usize,
    pub period: &'static str,
    pub interval: &'static str,
    pub chunk_size: usize,
}

/// Data requirements per scan type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    /// Daily history for the Supertrend detector.
    pub intraday_daily: HistoryRequest,
    /// Five-minute bars for the opening range detector, one symbol per call.
    pub opening_range: HistoryRequest,
    /// Daily history for swing detectors, fetched as separate batches.
    pub swing: Vec<HistoryRequest>,
    /// Number of leading universe symbols screened on fundamentals.
    pub fundamentals: usize,
}

impl Default for ScanPlan {
    fn default() -> Self {
        Self {
            intraday_daily: HistoryRequest {
                start: 0,
                end: 80,
                period: "3mo",
                interval: "1d",
                chunk_size: 40,
            },
            opening_range: HistoryRequest {
                start: 0,
                end: 20,
                period: "2d",
                interval: "5m",
                chunk_size: 1,
            },
            swing: vec![
                HistoryRequest {
                    start: 0,
                    end: 100,
                    period: "1y",
                    interval: "1d",
                    chunk_size: 50,
                },
                HistoryRequest {
                    start: 100,
                    end: 200,
                    period: "1y",
                    interval: "1d",
                    chunk_size: 50,
                },
            ],
            fundamentals: 30,
        }
    }
}

impl ScanPlan {
    /// Default plan with daily-history chunk sizes replaced.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        let mut plan = Self::default();
        plan.intraday_daily.chunk_size = chunk_size;
        for request in &mut plan.swing {
            request.chunk_size = chunk_size;
        }
        plan
    }
}

/// Detectors run on swing daily history, in merge order.
pub fn swing_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(FiftyTwoWeekBreakout::default()),
        Box::new(RsiOversoldBounce::default()),
        Box::new(EmaCrossover::default()),
        Box::new(BollingerSqueeze::default()),
    ]
}

/// Drop repeated (symbol, algorithm) pairs, keeping the first, then order by
/// confidence descending. Equal confidences keep their merge order.
pub fn merge_signals(signals: Vec<Signal>) -> Vec<Signal> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Signal> = signals
        .into_iter()
        .filter(|s| seen.insert((s.symbol().to_string(), s.algorithm().to_string())))
        .collect();
    unique.sort_by(|a, b| b.confidence().cmp(&a.confidence()));
    unique
}

/// Runs scans and caches their results per scan type and market day.
pub struct Scanner {
    fetcher: BatchFetcher,
    cache: Arc<ScanCache>,
    universe: Universe,
    plan: ScanPlan,
    offset: FixedOffset,
}

impl Scanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        cache: Arc<ScanCache>,
        universe: Universe,
        config: &ScannerConfig,
    ) -> Self {
        let plan = match config.chunk_size {
            Some(n) => ScanPlan::with_chunk_size(n),
            None => ScanPlan::default(),
        };
        Self {
            fetcher: BatchFetcher::new(provider, config.max_concurrent_chunks, config.fetch_timeout),
            cache,
            universe,
            plan,
            offset: config.market_offset(),
        }
    }

    /// Build a scanner with its own cache and the configured universe.
    pub fn from_config(provider: Arc<dyn MarketDataProvider>, config: &ScannerConfig) -> Self {
        let universe = match &config.universe {
            Some(symbols) => Universe::new(symbols.iter().cloned()),
            None => Universe::default(),
        };
        let cache = Arc::new(Cache::new(config.cache_ttl));
        Self::new(provider, cache, universe, config)
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn cache(&self) -> &ScanCache {
        &self.cache
    }

    /// Run a scan by name. Unknown names are rejected before any fetch.
    pub async fn run_scan(&self, scan_type: &str) -> Result<ScanResult> {
        let scan_type: ScanType = scan_type.parse()?;
        Ok(self.scan(scan_type).await)
    }

    /// Run (or serve from cache) a scan. Upstream failures only shrink the
    /// result; they never fail it.
    pub async fn scan(&self, scan_type: ScanType) -> ScanResult {
        let now = self.now();
        let key = (scan_type, now.date_naive());
        if let Some(cached) = self.cache.get(&key) {
            info!("Scan cache hit for {} ({})", scan_type, key.1);
            transition(scan_type, ScanPhase::Idle, ScanPhase::Cached);
            return cached;
        }
        debug!("Scan cache miss for {} ({})", scan_type, key.1);

        transition(scan_type, ScanPhase::Idle, ScanPhase::Fetching);
        let signals = match scan_type {
            ScanType::Intraday => self.scan_intraday().await,
            ScanType::Swing => self.scan_swing().await,
            ScanType::Longterm => self.scan_longterm().await,
        };

        transition(scan_type, ScanPhase::Detecting, ScanPhase::Merging);
        let raw = signals.len();
        let signals = merge_signals(signals);
        let result = ScanResult::new(scan_type, signals, self.universe.len(), now);
        info!(
            "Scan {} complete: {} signals ({} before dedup) over {} symbols",
            scan_type,
            result.count,
            raw,
            result.universe
        );

        self.cache.cleanup();
        self.cache.insert(key, result.clone());
        debug!("Scan cache holds {} results", self.cache.len());
        transition(scan_type, ScanPhase::Merging, ScanPhase::Cached);
        result
    }

    async fn fetch(&self, request: &HistoryRequest) -> SeriesStore {
        let symbols = self.universe.range(request.start, request.end);
        self.fetcher
            .fetch_batch(symbols, request.period, request.interval, request.chunk_size)
            .await
    }

    async fn scan_intraday(&self) -> Vec<Signal> {
        let (daily, bars) = tokio::join!(
            self.fetch(&self.plan.intraday_daily),
            self.fetch(&self.plan.opening_range)
        );

        transition(ScanType::Intraday, ScanPhase::Fetching, ScanPhase::Detecting);
        let mut signals = SupertrendEma::default().run(&daily);
        signals.extend(OpeningRangeBreakout::default().run(&bars));
        signals
    }

    async fn scan_swing(&self) -> Vec<Signal> {
        let mut store = SeriesStore::new();
        for request in &self.plan.swing {
            store.merge(self.fetch(request).await);
        }

        transition(ScanType::Swing, ScanPhase::Fetching, ScanPhase::Detecting);
        swing_detectors()
            .iter()
            .flat_map(|detector| detector.run(&store))
            .collect()
    }

    async fn scan_longterm(&self) -> Vec<Signal> {
        let symbols = self.universe.head(self.plan.fundamentals);
        let fundamentals = self.fetcher.fetch_fundamentals(symbols).await;

        transition(ScanType::Longterm, ScanPhase::Fetching, ScanPhase::Detecting);
        QualityValueScore::default().run(&fundamentals)
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

fn transition(scan_type: ScanType, from: ScanPhase, to: ScanPhase) {
    debug!("[scan:{}] {} -> {}", scan_type, from, to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::HistoryBatch;
    use crate::types::{Fundamentals, SignalSide};
    use async_trait::async_trait;
    use std::time::Duration;

    struct EmptyProvider;

    #[async_trait]
    impl MarketDataProvider for EmptyProvider {
        fn name(&self) -> &'static str {
            "empty"
        }

        async fn fetch_history(&self, _: &[String], _: &str, _: &str) -> Result<HistoryBatch> {
            Ok(HistoryBatch::new())
        }

        async fn fetch_fundamentals(&self, _: &str) -> Result<Fundamentals> {
            Ok(Fundamentals::default())
        }
    }

    fn signal(symbol: &str, algorithm: &str, confidence: f64) -> Signal {
        Signal::builder(symbol, algorithm, ScanType::Swing, SignalSide::Buy)
            .confidence(confidence)
            .build()
    }

    #[test]
    fn test_merge_dedups_first_wins() {
        let merged = merge_signals(vec![
            signal("A.NS", "RSI Oversold Bounce", 60.0),
            signal("A.NS", "RSI Oversold Bounce", 80.0),
            signal("A.NS", "EMA 9/21 Crossover", 70.0),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].algorithm(), "EMA 9/21 Crossover");
        assert_eq!(merged[1].confidence(), 60);
    }

    #[test]
    fn test_merge_dedups_across_suffixes() {
        // Symbols are compared after suffix cleaning
        let merged = merge_signals(vec![
            signal("TCS.NS", "BB Squeeze (TTM)", 66.0),
            signal("TCS.BO", "BB Squeeze (TTM)", 78.0),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].confidence(), 66);
    }

    #[test]
    fn test_merge_sort_is_stable() {
        let merged = merge_signals(vec![
            signal("A.NS", "X", 66.0),
            signal("B.NS", "X", 78.0),
            signal("C.NS", "X", 66.0),
            signal("D.NS", "X", 90.0),
        ]);
        let order: Vec<&str> = merged.iter().map(|s| s.symbol()).collect();
        assert_eq!(order, vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn test_default_plan() {
        let plan = ScanPlan::default();
        assert_eq!(plan.intraday_daily.end, 80);
        assert_eq!(plan.opening_range.end, 20);
        assert_eq!(plan.opening_range.interval, "5m");
        assert_eq!(plan.swing.len(), 2);
        assert_eq!(plan.swing[1].start, 100);
        assert_eq!(plan.swing[1].end, 200);
        assert_eq!(plan.fundamentals, 30);
    }

    #[test]
    fn test_chunk_override_leaves_opening_range_per_symbol() {
        let plan = ScanPlan::with_chunk_size(10);
        assert_eq!(plan.intraday_daily.chunk_size, 10);
        assert!(plan.swing.iter().all(|r| r.chunk_size == 10));
        assert_eq!(plan.opening_range.chunk_size, 1);
    }

    #[test]
    fn test_swing_detector_order() {
        let names: Vec<&str> = swing_detectors().iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            vec![
                "52W High Breakout",
                "RSI Oversold Bounce",
                "EMA 9/21 Crossover",
                "BB Squeeze (TTM)"
            ]
        );
    }

    #[tokio::test]
    async fn test_scan_evicts_expired_results_from_earlier_days() {
        let cache: Arc<ScanCache> = Arc::new(Cache::new(Duration::from_millis(200)));
        let scanner = Scanner::new(
            Arc::new(EmptyProvider),
            cache.clone(),
            Universe::new(["TCS.NS"]),
            &ScannerConfig::default(),
        );
        let now = scanner.now();
        let yesterday = now.date_naive().pred_opt().unwrap();
        cache.insert(
            (ScanType::Swing, yesterday),
            ScanResult::new(ScanType::Swing, vec![], 1, now),
        );
        tokio::time::sleep(Duration::from_millis(250)).await;

        scanner.scan(ScanType::Intraday).await;

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&(ScanType::Swing, yesterday)).is_none());
        assert!(cache
            .get(&(ScanType::Intraday, scanner.now().date_naive()))
            .is_some());
    }
}
