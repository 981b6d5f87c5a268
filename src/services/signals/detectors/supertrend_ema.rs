//! Supertrend lower band confirmed by EMA trend and volume.

use super::{nth_back, volume_vs_average, Detector, SkipReason, SymbolOutcome};
use crate::services::signals::indicators::{back_value, Ema, SupertrendLowerBand};
use crate::types::{ScanType, Series, Signal, SignalSide};

#[derive(Default)]
pub struct SupertrendEma {
    pub band: SupertrendLowerBand,
}

impl Detector for SupertrendEma {
    fn name(&self) -> &'static str {
        "Supertrend + EMA"
    }

    fn algo_type(&self) -> ScanType {
        ScanType::Intraday
    }

    fn min_bars(&self) -> usize {
        30
    }

    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let closes = series.closes();
        let (band, atr) = self
            .band
            .compute(&series.highs(), &series.lows(), &closes);
        let (Some(band_now), Some(band_prev), Some(atr)) =
            (back_value(&band, 0), back_value(&band, 1), back_value(&atr, 0))
        else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("supertrend band"));
        };
        let (Some(close), Some(prev_close)) = (nth_back(&closes, 0), nth_back(&closes, 1)) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("closes"));
        };
        let (Some(fast), Some(slow)) = (
            nth_back(&Ema::new(9).compute(&closes), 0),
            nth_back(&Ema::new(21).compute(&closes), 0),
        ) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("ema"));
        };
        let Some((volume, avg_volume)) = volume_vs_average(&series.volumes()) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("average volume"));
        };

        let above_band = close > band_now && prev_close > band_prev;
        if !above_band || fast <= slow || volume <= avg_volume {
            return SymbolOutcome::Quiet;
        }

        let ratio = volume / avg_volume;
        SymbolOutcome::Fired(
            Signal::builder(symbol, self.name(), self.algo_type(), SignalSide::Buy)
                .levels(close, band_now * 0.998, close + 2.0 * atr, close + 3.5 * atr)
                .confidence((68.0 + (ratio - 1.0) * 8.0).min(82.0))
                .timeframe("Intraday / Positional")
                .detail(format!("Supertrend bullish. EMA9>EMA21. Vol {:.1}x.", ratio))
                .risk_reward("1:2")
                .tags(&["Supertrend", "Trend"])
                .build(),
        )
    }
}
