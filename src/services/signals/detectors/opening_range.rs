//! Opening range breakout on intraday bars.

use super::{Detector, SkipReason, SymbolOutcome};
use crate::types::{OhlcPoint, ScanType, Series, Signal, SignalSide};

/// Fires when the latest intraday close breaks out of the high/low range of
/// an early window of bars, with the recent window trading heavier than the
/// whole fetch.
pub struct OpeningRangeBreakout {
    /// Bars in the opening window.
    pub window: usize,
    /// Bars after the opening window when the fetch is long enough.
    pub rest: usize,
    pub volume_multiple: f64,
}

impl Default for OpeningRangeBreakout {
    fn default() -> Self {
        Self {
            window: 3,
            rest: 9,
            volume_multiple: 1.2,
        }
    }
}

impl OpeningRangeBreakout {
    /// Split bars into the opening window and the bars that follow it.
    ///
    /// With more than `window + rest` bars the opening window is anchored
    /// `rest` bars before the end; otherwise it is the first `window` bars.
    fn split<'a>(&self, bars: &'a [OhlcPoint]) -> (&'a [OhlcPoint], &'a [OhlcPoint]) {
        let n = bars.len();
        let span = self.window + self.rest;
        if n > span {
            (&bars[n - span..n - self.rest], &bars[n - self.rest..])
        } else {
            let cut = self.window.min(n);
            (&bars[..cut], &bars[cut..])
        }
    }
}

fn mean_volume(bars: &[OhlcPoint]) -> f64 {
    if bars.is_empty() {
        return 0.0;
    }
    bars.iter().map(|b| b.volume).sum::<f64>() / bars.len() as f64
}

impl Detector for OpeningRangeBreakout {
    fn name(&self) -> &'static str {
        "Opening Range Breakout"
    }

    fn algo_type(&self) -> ScanType {
        ScanType::Intraday
    }

    fn min_bars(&self) -> usize {
        6
    }

    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let bars = series.bars();
        let (opening, rest) = self.split(bars);
        if opening.len() < 2 || rest.is_empty() {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("opening window"));
        }

        let or_high = opening.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let or_low = opening.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let range = or_high - or_low;
        if range <= 0.0 {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("flat opening range"));
        }
        let Some(close) = rest.last().map(|b| b.close) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("closes"));
        };

        let avg_volume = mean_volume(bars);
        let recent_volume = mean_volume(rest);
        if recent_volume <= avg_volume * self.volume_multiple {
            return SymbolOutcome::Quiet;
        }
        let ratio = recent_volume / avg_volume;

        let builder = if close > or_high * 1.001 {
            Signal::builder(symbol, self.name(), self.algo_type(), SignalSide::Buy)
                .levels(or_high, or_low, or_high + range * 1.5, or_high + range * 2.5)
                .confidence(73.0)
                .detail(format!(
                    "ORB high {:.0} | Range {:.0}pts | Vol {:.1}x.",
                    or_high, range, ratio
                ))
                .tags(&["ORB", "Breakout"])
        } else if close < or_low * 0.999 {
            Signal::builder(symbol, self.name(), self.algo_type(), SignalSide::Short)
                .levels(or_low, or_high, or_low - range * 1.5, or_low - range * 2.5)
                .confidence(70.0)
                .detail(format!(
                    "ORB breakdown {:.0} | Range {:.0}pts | Vol {:.1}x.",
                    or_low, range, ratio
                ))
                .tags(&["ORB", "Breakdown"])
        } else {
            return SymbolOutcome::Quiet;
        };

        SymbolOutcome::Fired(
            builder
                .timeframe("Intraday")
                .risk_reward("1:1.5")
                .build(),
        )
    }
}
