//! RSI oversold bounce.

use super::{nth_back, volume_vs_average, Detector, SkipReason, SymbolOutcome};
use crate::services::signals::indicators::{back_value, rolling_mean, Atr, Rsi};
use crate::types::{ScanType, Series, Signal, SignalSide};

const LONG_TREND_PERIOD: usize = 200;

/// Fires when RSI turns up from below the oversold level while price holds
/// near its long-term average and volume is above normal.
pub struct RsiOversoldBounce {
    pub oversold: f64,
    /// Minimum RSI gain on the latest bar.
    pub min_turn: f64,
}

impl Default for RsiOversoldBounce {
    fn default() -> Self {
        Self {
            oversold: 35.0,
            min_turn: 1.0,
        }
    }
}

impl Detector for RsiOversoldBounce {
    fn name(&self) -> &'static str {
        "RSI Oversold Bounce"
    }

    fn algo_type(&self) -> ScanType {
        ScanType::Swing
    }

    fn min_bars(&self) -> usize {
        60
    }

    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let closes = series.closes();
        let rsi = Rsi::default().compute(&closes);
        let (Some(prev_rsi), Some(cur_rsi)) = (back_value(&rsi, 1), back_value(&rsi, 0)) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("rsi"));
        };
        let Some(close) = nth_back(&closes, 0) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("empty series"));
        };
        // Short histories stand in a long-term average 10% below price
        let long_avg = if closes.len() >= LONG_TREND_PERIOD {
            rolling_mean(&closes, LONG_TREND_PERIOD).last().copied().flatten()
        } else {
            Some(close * 0.9)
        };
        let Some(long_avg) = long_avg else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("200-bar average"));
        };
        let atr = Atr::default().compute(&series.highs(), &series.lows(), &closes);
        let Some(atr) = back_value(&atr, 0) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("atr"));
        };
        let Some((volume, avg_volume)) = volume_vs_average(&series.volumes()) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("average volume"));
        };

        let turned_up = prev_rsi < self.oversold && cur_rsi > prev_rsi + self.min_turn;
        if !turned_up || close <= long_avg * 0.98 || volume <= avg_volume {
            return SymbolOutcome::Quiet;
        }

        let ratio = volume / avg_volume;
        let confidence = (55.0 + (self.oversold - prev_rsi) * 2.0 + (ratio - 1.0) * 5.0).min(88.0);

        SymbolOutcome::Fired(
            Signal::builder(symbol, self.name(), self.algo_type(), SignalSide::Buy)
                .levels(close, close - 2.0 * atr, close + 3.0 * atr, close + 5.0 * atr)
                .confidence(confidence)
                .timeframe("Swing (1-3 weeks)")
                .detail(format!("RSI {:.0}→{:.0}. Above 200DMA.", prev_rsi, cur_rsi))
                .risk_reward("1:1.5")
                .tags(&["RSI", "Mean Reversion"])
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{series_from, volumes_with_last};
    use super::*;
    use crate::services::SeriesStore;

    /// Flat, then fourteen straight down days, then a 5-point up day.
    fn bounce_closes(n: usize) -> Vec<f64> {
        let mut closes = vec![100.0; n - 15];
        for i in 1..=14 {
            closes.push(100.0 - i as f64);
        }
        closes.push(91.0);
        closes
    }

    #[test]
    fn test_fires_on_bounce() {
        let series = series_from(&bounce_closes(70), 1.0, &volumes_with_last(70, 2000.0));
        let signal = RsiOversoldBounce::default()
            .scan_symbol("INFY.NS", &series)
            .signal()
            .unwrap();

        assert_eq!(signal.symbol(), "INFY");
        assert_eq!(signal.side(), SignalSide::Buy);
        // 55 + 35*2 + 0.9*5 exceeds the cap
        assert_eq!(signal.confidence(), 88);
        assert_eq!(signal.detail(), "RSI 0→28. Above 200DMA.");
        assert_eq!(signal.entry(), 91.0);
        assert!(signal.stop_loss() < signal.entry());
        assert!(signal.target_2() > signal.target_1());
    }

    #[test]
    fn test_quiet_without_volume() {
        let series = series_from(&bounce_closes(70), 1.0, &vec![1000.0; 70]);
        assert_eq!(
            RsiOversoldBounce::default().scan_symbol("X.NS", &series),
            SymbolOutcome::Quiet
        );
    }

    #[test]
    fn test_quiet_when_still_falling() {
        let mut closes = bounce_closes(70);
        if let Some(last) = closes.last_mut() {
            *last = 85.0;
        }
        let series = series_from(&closes, 1.0, &volumes_with_last(70, 2000.0));
        assert_eq!(
            RsiOversoldBounce::default().scan_symbol("X.NS", &series),
            SymbolOutcome::Quiet
        );
    }

    #[test]
    fn test_quiet_below_long_average() {
        // 200+ bars at 150 put the long-term average far above the bounce
        let mut closes = vec![150.0; 200];
        closes.extend(bounce_closes(30));
        let n = closes.len();
        let series = series_from(&closes, 1.0, &volumes_with_last(n, 2000.0));
        assert_eq!(
            RsiOversoldBounce::default().scan_symbol("X.NS", &series),
            SymbolOutcome::Quiet
        );
    }

    #[test]
    fn test_no_signal_under_sixty_bars() {
        let series = series_from(&bounce_closes(59), 1.0, &volumes_with_last(59, 2000.0));
        let mut store = SeriesStore::new();
        store.insert("X.NS", series);
        assert!(RsiOversoldBounce::default().run(&store).is_empty());
    }
}
