//! Shared mock provider and price fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use nifty_scanner::config::ScannerConfig;
use nifty_scanner::error::{AppError, Result};
use nifty_scanner::services::{Cache, ScanCache, Scanner};
use nifty_scanner::sources::{HistoryBatch, MarketDataProvider};
use nifty_scanner::types::{Fundamentals, OhlcPoint};
use nifty_scanner::universe::Universe;

const DAY_MS: i64 = 86_400_000;
const FIVE_MIN_MS: i64 = 300_000;

// ============================================================================
// Mock Provider
// ============================================================================

/// In-memory provider. Daily (`1d`) and intraday requests are served from
/// separate maps; any chunk containing a failing symbol errors as a whole.
#[derive(Default)]
pub struct MockProvider {
    pub daily: HashMap<String, Vec<OhlcPoint>>,
    pub intraday: HashMap<String, Vec<OhlcPoint>>,
    pub fundamentals: HashMap<String, Fundamentals>,
    pub failing: HashSet<String>,
    pub fail_all: bool,
    pub history_calls: AtomicUsize,
    pub fundamentals_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_everything() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn with_daily(mut self, symbol: &str, bars: Vec<OhlcPoint>) -> Self {
        self.daily.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_intraday(mut self, symbol: &str, bars: Vec<OhlcPoint>) -> Self {
        self.intraday.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_fundamentals(mut self, symbol: &str, f: Fundamentals) -> Self {
        self.fundamentals.insert(symbol.to_string(), f);
        self
    }

    pub fn failing_on(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn fundamentals_calls(&self) -> usize {
        self.fundamentals_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.history_calls() + self.fundamentals_calls()
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch_history(
        &self,
        symbols: &[String],
        _period: &str,
        interval: &str,
    ) -> Result<HistoryBatch> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all || symbols.iter().any(|s| self.failing.contains(s)) {
            return Err(AppError::ExternalApi("mock network failure".into()));
        }
        let source = if interval == "1d" {
            &self.daily
        } else {
            &self.intraday
        };
        Ok(symbols
            .iter()
            .filter_map(|s| source.get(s).map(|bars| (s.clone(), bars.clone())))
            .collect())
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        self.fundamentals_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all || self.failing.contains(symbol) {
            return Err(AppError::ExternalApi("mock network failure".into()));
        }
        Ok(self.fundamentals.get(symbol).cloned().unwrap_or_default())
    }
}

// ============================================================================
// Scanner construction
// ============================================================================

pub fn test_config() -> ScannerConfig {
    ScannerConfig {
        fetch_timeout: Duration::from_secs(5),
        ..ScannerConfig::default()
    }
}

pub fn scanner_with(provider: Arc<MockProvider>, symbols: &[&str], ttl: Duration) -> Scanner {
    let cache: Arc<ScanCache> = Arc::new(Cache::new(ttl));
    Scanner::new(
        provider,
        cache,
        Universe::new(symbols.iter().copied()),
        &test_config(),
    )
}

pub fn scanner(provider: Arc<MockProvider>, symbols: &[&str]) -> Scanner {
    scanner_with(provider, symbols, Duration::from_secs(900))
}

// ============================================================================
// Fixtures
// ============================================================================

/// Daily bars from closes with a fixed high/low spread.
pub fn daily_bars(closes: &[f64], spread: f64, volumes: &[f64]) -> Vec<OhlcPoint> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| OhlcPoint::new(i as i64 * DAY_MS, c, c + spread, c - spread, c, v))
        .collect()
}

fn volumes_with_last(n: usize, last: f64) -> Vec<f64> {
    let mut v = vec![1000.0; n];
    v[n - 1] = last;
    v
}

/// 120 bars climbing to 110, closing 1% under the high on ~1.6x volume.
/// Fires the 52-week breakout (69) and a coiling squeeze (66).
pub fn breakout_bars() -> Vec<OhlcPoint> {
    let mut closes: Vec<f64> = (0..119).map(|i| 80.0 + i as f64 * (30.0 / 118.0)).collect();
    closes.push(110.0 * 0.99);
    daily_bars(&closes, 1.0, &volumes_with_last(120, 1700.0))
}

/// 40 flat bars then a 30% jump. Fires a squeeze release (78) and a bullish
/// EMA crossover (60).
pub fn squeeze_release_bars() -> Vec<OhlcPoint> {
    let mut closes = vec![100.0; 39];
    closes.push(130.0);
    daily_bars(&closes, 2.0, &vec![1000.0; 40])
}

/// Flat, fourteen down days, then an up day on double volume. Fires the RSI
/// bounce (88).
pub fn rsi_bounce_bars() -> Vec<OhlcPoint> {
    let mut closes = vec![100.0; 55];
    for i in 1..=14 {
        closes.push(100.0 - i as f64);
    }
    closes.push(91.0);
    daily_bars(&closes, 1.0, &volumes_with_last(70, 2000.0))
}

/// Steady uptrend on double volume. Fires Supertrend + EMA (75).
pub fn uptrend_bars() -> Vec<OhlcPoint> {
    let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
    daily_bars(&closes, 1.0, &volumes_with_last(40, 2000.0))
}

/// Steep, narrow-range trend on flat volume. Fires nothing.
pub fn quiet_bars() -> Vec<OhlcPoint> {
    let closes: Vec<f64> = (0..120).map(|i| 100.0 + 2.0 * i as f64).collect();
    daily_bars(&closes, 0.1, &vec![1000.0; 120])
}

/// Twenty 5-minute bars: opening range 99-101, then a breakout to
/// `last_close` on triple volume.
pub fn orb_session(last_close: f64) -> Vec<OhlcPoint> {
    (0..20)
        .map(|i| {
            let t = i as i64 * FIVE_MIN_MS;
            if i < 11 {
                OhlcPoint::new(t, 100.0, 101.0, 99.0, 100.0, 1000.0)
            } else {
                let c = if i == 19 { last_close } else { 100.0 };
                OhlcPoint::new(t, c, c + 0.5, c - 0.5, c, 3000.0)
            }
        })
        .collect()
}

/// Fundamentals scoring 90.
pub fn strong_fundamentals() -> Fundamentals {
    Fundamentals {
        return_on_equity: Some(0.25),
        debt_to_equity: Some(20.0),
        trailing_pe: Some(25.0),
        forward_pe: Some(20.0),
        earnings_growth: Some(0.20),
        revenue_growth: Some(0.12),
        dividend_yield: Some(0.02),
        current_price: Some(1500.0),
        regular_market_price: None,
    }
}

/// Fundamentals passing the gate but scoring 57.
pub fn decent_fundamentals() -> Fundamentals {
    Fundamentals {
        return_on_equity: Some(0.18),
        debt_to_equity: Some(45.0),
        trailing_pe: Some(30.0),
        forward_pe: Some(26.0),
        earnings_growth: Some(0.12),
        revenue_growth: Some(0.11),
        dividend_yield: None,
        current_price: None,
        regular_market_price: Some(800.0),
    }
}
