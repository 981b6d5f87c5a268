//! Bollinger/Keltner squeeze (TTM style).

use super::{nth_back, Detector, SkipReason, SymbolOutcome};
use crate::services::signals::indicators::{back_value, Atr, Bands, BollingerBands, KeltnerChannel};
use crate::types::{ScanType, Series, Signal, SignalSide};

/// Bars between the latest close and the momentum reference close.
const MOMENTUM_LOOKBACK: usize = 4;

/// Fires while Bollinger bands sit inside the Keltner channel (coiling) and
/// on the first bar after they leave it (release). Direction follows
/// five-bar momentum.
#[derive(Default)]
pub struct BollingerSqueeze {
    pub bollinger: BollingerBands,
    pub keltner: KeltnerChannel,
}

fn inside(bb: &Bands, kc: &Bands, back: usize) -> Option<bool> {
    let (bb_upper, bb_lower) = bb.at_back(back)?;
    let (kc_upper, kc_lower) = kc.at_back(back)?;
    Some(bb_upper < kc_upper && bb_lower > kc_lower)
}

impl Detector for BollingerSqueeze {
    fn name(&self) -> &'static str {
        "BB Squeeze (TTM)"
    }

    fn algo_type(&self) -> ScanType {
        ScanType::Swing
    }

    fn min_bars(&self) -> usize {
        30
    }

    fn evaluate(&self, symbol: &str, series: &Series) -> SymbolOutcome {
        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let bb = self.bollinger.compute(&closes);
        let kc = self.keltner.compute(&highs, &lows, &closes);

        let (Some(on_now), Some(on_prev)) = (inside(&bb, &kc, 0), inside(&bb, &kc, 1)) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("bands"));
        };
        let released = on_prev && !on_now;
        if !on_now && !released {
            return SymbolOutcome::Quiet;
        }

        let (Some(close), Some(reference)) =
            (nth_back(&closes, 0), nth_back(&closes, MOMENTUM_LOOKBACK))
        else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("momentum"));
        };
        if reference == 0.0 {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("zero reference close"));
        }
        let Some(atr) = back_value(&Atr::default().compute(&highs, &lows, &closes), 0) else {
            return SymbolOutcome::Skipped(SkipReason::Degenerate("atr"));
        };

        let momentum = (close - reference) / reference * 100.0;
        let side = if momentum >= 0.0 {
            SignalSide::Buy
        } else {
            SignalSide::Sell
        };
        let m = side.direction();
        let (state, confidence) = if released {
            ("Squeeze released!", 78.0)
        } else {
            ("Coiling.", 66.0)
        };

        SymbolOutcome::Fired(
            Signal::builder(symbol, self.name(), self.algo_type(), side)
                .levels(
                    close,
                    close - m * 1.5 * atr,
                    close + m * 3.0 * atr,
                    close + m * 5.0 * atr,
                )
                .confidence(confidence)
                .timeframe("Swing (2-4 weeks)")
                .detail(format!("{} Mom {:+.1}% (5d).", state, momentum))
                .risk_reward("1:2")
                .tags(&["Squeeze", "Volatility"])
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::series_from;
    use super::*;

    #[test]
    fn test_coiling() {
        // Tight closes inside a wide daily range
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i % 2) as f64 * 0.1).collect();
        let series = series_from(&closes, 2.0, &vec![1000.0; 40]);
        let signal = BollingerSqueeze::default()
            .scan_symbol("SBIN.NS", &series)
            .signal()
            .unwrap();

        assert_eq!(signal.confidence(), 66);
        assert_eq!(signal.side(), SignalSide::Buy);
        assert_eq!(signal.detail(), "Coiling. Mom +0.0% (5d).");
    }

    #[test]
    fn test_release() {
        let mut closes = vec![100.0; 39];
        closes.push(130.0);
        let series = series_from(&closes, 2.0, &vec![1000.0; 40]);
        let signal = BollingerSqueeze::default()
            .scan_symbol("SBIN.NS", &series)
            .signal()
            .unwrap();

        assert_eq!(signal.confidence(), 78);
        assert_eq!(signal.side(), SignalSide::Buy);
        assert_eq!(signal.detail(), "Squeeze released! Mom +30.0% (5d).");
    }

    #[test]
    fn test_release_downward_is_sell() {
        let mut closes = vec![100.0; 39];
        closes.push(70.0);
        let series = series_from(&closes, 2.0, &vec![1000.0; 40]);
        let signal = BollingerSqueeze::default()
            .scan_symbol("SBIN.NS", &series)
            .signal()
            .unwrap();

        assert_eq!(signal.side(), SignalSide::Sell);
        assert!(signal.stop_loss() > signal.entry());
        assert_eq!(signal.detail(), "Squeeze released! Mom -30.0% (5d).");
    }

    #[test]
    fn test_quiet_when_bands_wide() {
        // Steady trend with a tiny daily range
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        let series = series_from(&closes, 0.1, &vec![1000.0; 40]);
        assert_eq!(
            BollingerSqueeze::default().scan_symbol("X.NS", &series),
            SymbolOutcome::Quiet
        );
    }
}
