//! Signal detectors.
//!
//! Each detector inspects one symbol's history at a time and either fires a
//! [`Signal`], stays quiet, or skips the symbol. A skip never affects other
//! symbols or other detectors.

pub mod breakout;
pub mod ema_cross;
pub mod opening_range;
pub mod quality_value;
pub mod rsi_bounce;
pub mod squeeze;
pub mod supertrend_ema;

pub use breakout::FiftyTwoWeekBreakout;
pub use ema_cross::EmaCrossover;
pub use opening_range::OpeningRangeBreakout;
pub use quality_value::QualityValueScore;
pub use rsi_bounce::RsiOversoldBounce;
pub use squeeze::BollingerSqueeze;
pub use supertrend_ema::SupertrendEma;

use std::fmt;
use tracing::debug;

use super::indicators::rolling_mean;
use crate::services::SeriesStore;
use crate::types::{ScanType, Series, Signal};

/// Window for the average-volume comparisons shared by most detectors.
pub const VOLUME_AVG_PERIOD: usize = 20;

/// Why a detector did not evaluate a symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InsufficientHistory { have: usize, need: usize },
    /// An input needed by the trigger was undefined or zero.
    Degenerate(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientHistory { have, need } => {
                write!(f, "insufficient history ({} of {} bars)", have, need)
            }
            SkipReason::Degenerate(what) => write!(f, "degenerate input: {}", what),
        }
    }
}

/// Per-symbol result of one detector.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Fired(Signal),
    Quiet,
    Skipped(SkipReason),
}

impl SymbolOutcome {
    pub fn signal(self) -> Option<Signal> {
        match self {
            SymbolOutcome::Fired(signal) => Some(signal),
            _ => None,
        }
    }
}

/// Trait for price-history signal detectors.
pub trait Detector: Send + Sync {
    /// Algorithm name carried on every emitted signal.
    fn name(&self) -> &'static str;

    /// Holding-style label for emitted signals.
    fn algo_type(&self) -> ScanType;

    /// Minimum number of bars required before evaluating.
    fn min_bars(&self) -> usize;

    /// Evaluate the latest bar(s) of one symbol. Callers go through
    /// [`Detector::scan_symbol`], which enforces [`Detector::min_bars`].
    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome;

    fn scan_symbol(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let need = self.min_bars();
        if series.len() < need {
            return SymbolOutcome::Skipped(SkipReason::InsufficientHistory {
                have: series.len(),
                need,
            });
        }
        self.evaluate(symbol, series)
    }

    /// Run over every symbol in the store, in store order.
    fn run(&self, store: &SeriesStore) -> Vec<Signal> {
        let mut signals = Vec::new();
        for (symbol, series) in store.iter() {
            match self.scan_symbol(symbol, series) {
                SymbolOutcome::Fired(signal) => signals.push(signal),
                SymbolOutcome::Quiet => {}
                SymbolOutcome::Skipped(reason) => {
                    debug!("[{}] Skipping {}: {}", self.name(), symbol, reason);
                }
            }
        }
        debug!(
            "[{}] {} signals from {} symbols",
            self.name(),
            signals.len(),
            store.len()
        );
        signals
    }
}

/// Value `back` positions before the last element (0 = last).
pub(crate) fn nth_back(values: &[f64], back: usize) -> Option<f64> {
    let idx = values.len().checked_sub(back + 1)?;
    Some(values[idx])
}

/// Latest volume and its trailing average, both over [`VOLUME_AVG_PERIOD`]
/// bars ending at the latest one. `None` when the average is undefined or
/// not positive.
pub(crate) fn volume_vs_average(volumes: &[f64]) -> Option<(f64, f64)> {
    let avg = rolling_mean(volumes, VOLUME_AVG_PERIOD).last().copied().flatten()?;
    if avg <= 0.0 {
        return None;
    }
    Some((nth_back(volumes, 0)?, avg))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    struct AlwaysFires;

    impl Detector for AlwaysFires {
        fn name(&self) -> &'static str {
            "Always"
        }
        fn algo_type(&self) -> ScanType {
            ScanType::Swing
        }
        fn min_bars(&self) -> usize {
            10
        }
        fn evaluate(&self, symbol: &str, _series: &Series) -> SymbolOutcome {
            SymbolOutcome::Fired(
                Signal::builder(symbol, self.name(), self.algo_type(), crate::types::SignalSide::Buy)
                    .confidence(50.0)
                    .build(),
            )
        }
    }

    #[test]
    fn test_scan_symbol_enforces_min_bars() {
        let short = series_from(&[100.0; 9], 1.0, &[1000.0; 9]);
        assert_eq!(
            AlwaysFires.scan_symbol("A.NS", &short),
            SymbolOutcome::Skipped(SkipReason::InsufficientHistory { have: 9, need: 10 })
        );
    }

    #[test]
    fn test_run_skips_per_symbol() {
        let mut store = SeriesStore::new();
        store.insert("A.NS", series_from(&[100.0; 12], 1.0, &[1000.0; 12]));
        store.insert("B.NS", series_from(&[100.0; 3], 1.0, &[1000.0; 3]));
        store.insert("C.NS", series_from(&[100.0; 10], 1.0, &[1000.0; 10]));

        let signals = AlwaysFires.run(&store);
        let symbols: Vec<&str> = signals.iter().map(|s| s.symbol()).collect();
        assert_eq!(symbols, vec!["A", "C"]);
    }

    #[test]
    fn test_volume_vs_average() {
        let volumes = volumes_with_last(25, 3000.0);
        let (cur, avg) = volume_vs_average(&volumes).unwrap();
        assert_eq!(cur, 3000.0);
        assert_eq!(avg, 1100.0);
        assert!(volume_vs_average(&[1000.0; 19]).is_none());
        assert!(volume_vs_average(&[0.0; 25]).is_none());
    }

    #[test]
    fn test_nth_back() {
        assert_eq!(nth_back(&[1.0, 2.0, 3.0], 0), Some(3.0));
        assert_eq!(nth_back(&[1.0, 2.0, 3.0], 2), Some(1.0));
        assert_eq!(nth_back(&[1.0], 1), None);
    }
}
