//! Keltner Channel indicator.

use super::{Atr, Bands, Ema};

/// Keltner Channel: EMA(close) middle line, bands at `atr_multiplier` ATRs.
pub struct KeltnerChannel {
    period: usize,
    atr_multiplier: f64,
}

impl Default for KeltnerChannel {
    fn default() -> Self {
        Self::new(20, 1.5)
    }
}

impl KeltnerChannel {
    pub fn new(period: usize, atr_multiplier: f64) -> Self {
        Self {
            period,
            atr_multiplier,
        }
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> Bands {
        let middle = Ema::new(self.period).compute(close);
        let atr = Atr::new(self.period).compute(high, low, close);
        let k = self.atr_multiplier;

        let upper = middle
            .iter()
            .zip(&atr)
            .map(|(m, a)| a.map(|a| m + k * a))
            .collect();
        let lower = middle
            .iter()
            .zip(&atr)
            .map(|(m, a)| a.map(|a| m - k * a))
            .collect();

        Bands {
            upper,
            middle: middle.into_iter().map(Some).collect(),
            lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keltner_width_is_three_atr() {
        let close = vec![100.0; 30];
        let high = vec![101.0; 30];
        let low = vec![99.0; 30];
        let bands = KeltnerChannel::default().compute(&high, &low, &close);
        // ATR = 2.0, bands at +/- 1.5 * 2.0
        assert_eq!(bands.upper[29], Some(103.0));
        assert_eq!(bands.lower[29], Some(97.0));
        assert_eq!(bands.middle[29], Some(100.0));
    }

    #[test]
    fn test_keltner_warm_up_follows_atr() {
        let close = vec![100.0; 30];
        let high = vec![101.0; 30];
        let low = vec![99.0; 30];
        let bands = KeltnerChannel::new(20, 1.5).compute(&high, &low, &close);
        assert!(bands.upper[18].is_none());
        assert!(bands.upper[19].is_some());
        assert!(bands.middle[0].is_some());
    }
}
