//! Simplified Supertrend lower band.
//!
//! Only the bullish bound is produced: `(high + low) / 2 - k * ATR(period)`.
//! There is no band ratcheting or trend flipping; detector thresholds are
//! tuned against this form.

use super::Atr;

pub struct SupertrendLowerBand {
    period: usize,
    multiplier: f64,
}

impl Default for SupertrendLowerBand {
    fn default() -> Self {
        Self::new(10, 3.0)
    }
}

impl SupertrendLowerBand {
    pub fn new(period: usize, multiplier: f64) -> Self {
        Self { period, multiplier }
    }

    /// Lower band together with the ATR it was derived from.
    pub fn compute(
        &self,
        high: &[f64],
        low: &[f64],
        close: &[f64],
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let atr = Atr::new(self.period).compute(high, low, close);
        let band = atr
            .iter()
            .enumerate()
            .map(|(i, a)| a.map(|a| (high[i] + low[i]) / 2.0 - self.multiplier * a))
            .collect();
        (band, atr)
    }
}
