//! Bollinger Bands indicator.

use super::sma::{rolling_mean, rolling_std};
use super::Bands;

/// Bollinger Bands indicator.
///
/// Consists of:
/// - Middle band: SMA(period)
/// - Upper band: SMA + k * StdDev
/// - Lower band: SMA - k * StdDev
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev_multiplier: f64) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }

    pub fn compute(&self, closes: &[f64]) -> Bands {
        let middle = rolling_mean(closes, self.period);
        let std = rolling_std(closes, self.period);
        let k = self.std_dev_multiplier;

        let upper = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| Some((*m)? + k * (*s)?))
            .collect();
        let lower = middle
            .iter()
            .zip(&std)
            .map(|(m, s)| Some((*m)? - k * (*s)?))
            .collect();

        Bands {
            upper,
            middle,
            lower,
        }
    }
}
