//! Average True Range (ATR) indicator.

use super::sma::rolling_mean;

/// ATR (Average True Range) indicator.
///
/// Rolling mean of true range:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first bar has no previous close, so its true range is High-Low.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate the true range series.
    pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let n = high.len().min(low.len()).min(close.len());
        (0..n)
            .map(|i| {
                let hl = high[i] - low[i];
                if i == 0 {
                    return hl;
                }
                let hc = (high[i] - close[i - 1]).abs();
                let lc = (low[i] - close[i - 1]).abs();
                hl.max(hc).max(lc)
            })
            .collect()
    }

    pub fn compute(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        rolling_mean(&Self::true_range(high, low, close), self.period)
    }
}
