//! 52-week high breakout.

use super::{nth_back, volume_vs_average, Detector, SkipReason, SymbolOutcome};
use crate::types::{ScanType, Series, Signal, SignalSide};

/// Fires when the close sits just under (or marginally above) the highest
/// close of the fetched year on heavy volume.
pub struct FiftyTwoWeekBreakout {
    /// Accepted distance from the high, in percent.
    pub band: (f64, f64),
    pub volume_multiple: f64,
}

impl Default for FiftyTwoWeekBreakout {
    fn default() -> Self {
        Self {
            band: (-3.5, 0.5),
            volume_multiple: 1.4,
        }
    }
}

impl Detector for FiftyTwoWeekBreakout {
    fn name(&self) -> &'static str {
        "52W High Breakout"
    }

    fn algo_type(&self) -> ScanType {
        ScanType::Swing
    }

    fn min_bars(&self) -> usize {
        100
    }

    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let closes = series.closes();
        let high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let Some(close) = nth_back(&closes, 0) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("empty series"));
        };
        if high <= 0.0 {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("non-positive high"));
        }
        let Some((volume, avg_volume)) = volume_vs_average(&series.volumes()) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("average volume"));
        };

        let pct = (close - high) / high * 100.0;
        let (lo, hi) = self.band;
        if pct < lo || pct > hi || volume <= avg_volume * self.volume_multiple {
            return SymbolOutcome::Quiet;
        }

        let ratio = volume / avg_volume;
        let confidence = (65.0 + ((ratio - self.volume_multiple) * 18.0).min(25.0)).min(93.0);

        SymbolOutcome::Fired(
            Signal::builder(symbol, self.name(), self.algo_type(), SignalSide::Buy)
                .levels(close, close * 0.92, close * 1.10, close * 1.20)
                .confidence(confidence)
                .timeframe("Swing (2-6 weeks)")
                .detail(format!(
                    "Within {:.1}% of 52W high. Vol {:.1}x.",
                    pct.abs(),
                    ratio
                ))
                .risk_reward("1:1.4")
                .tags(&["Momentum", "Breakout"])
                .build(),
        )
    }
}
