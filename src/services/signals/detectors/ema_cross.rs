//! EMA 9/21 crossover.

use super::{nth_back, volume_vs_average, Detector, SkipReason, SymbolOutcome};
use crate::services::signals::indicators::{back_value, Atr, Ema};
use crate::types::{ScanType, Series, Signal, SignalSide};

/// Fires on the bar where the fast EMA crosses the slow one, in either
/// direction.
pub struct EmaCrossover {
    pub fast: usize,
    pub slow: usize,
}

impl Default for EmaCrossover {
    fn default() -> Self {
        Self { fast: 9, slow: 21 }
    }
}

impl Detector for EmaCrossover {
    fn name(&self) -> &'static str {
        "EMA 9/21 Crossover"
    }

    fn algo_type(&self) -> ScanType {
        ScanType::Swing
    }

    fn min_bars(&self) -> usize {
        25
    }

    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let closes = series.closes();
        let fast = Ema::new(self.fast).compute(&closes);
        let slow = Ema::new(self.slow).compute(&closes);
        let (Some(f_prev), Some(s_prev), Some(f_cur), Some(s_cur)) = (
            nth_back(&fast, 1),
            nth_back(&slow, 1),
            nth_back(&fast, 0),
            nth_back(&slow, 0),
        ) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("ema"));
        };

        let bullish = f_prev <= s_prev && f_cur > s_cur;
        let bearish = f_prev >= s_prev && f_cur < s_cur;
        if !bullish && !bearish {
            return SymbolOutcome::Quiet;
        }

        let Some(close) = nth_back(&closes, 0) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("empty series"));
        };
        let atr = Atr::default().compute(&series.highs(), &series.lows(), &closes);
        let Some(atr) = back_value(&atr, 0) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("atr"));
        };
        let Some((volume, avg_volume)) = volume_vs_average(&series.volumes()) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("average volume"));
        };

        let (side, word) = if bullish {
            (SignalSide::Buy, "above")
        } else {
            (SignalSide::Sell, "below")
        };
        let m = side.direction();
        let ratio = volume / avg_volume;

        SymbolOutcome::Fired(
            Signal::builder(symbol, self.name(), self.algo_type(), side)
                .levels(
                    close,
                    close - m * 1.5 * atr,
                    close + m * 2.5 * atr,
                    close + m * 4.0 * atr,
                )
                .confidence((60.0 + (ratio - 1.0) * 10.0).min(85.0))
                .timeframe("Swing (5-15 days)")
                .detail(format!("EMA9 {} EMA21. Vol {:.1}x.", word, ratio))
                .risk_reward("1:1.7")
                .tags(&["Trend", "EMA Crossover"])
                .build(),
        )
    }
}
