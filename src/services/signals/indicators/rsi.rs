//! Relative Strength Index (RSI) indicator.

/// Guard against a zero average loss.
const EPSILON: f64 = 1e-10;

/// RSI (Relative Strength Index) indicator.
///
/// Compares the rolling mean of gains with the rolling mean of losses over
/// `period` close-to-close changes. Values range from 0-100; the first
/// defined value is at index `period`.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn compute(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let n = closes.len();
        let mut out = vec![None; n];
        if self.period == 0 || n <= self.period {
            return out;
        }

        let mut gains = vec![0.0; n];
        let mut losses = vec![0.0; n];
        for i in 1..n {
            let change = closes[i] - closes[i - 1];
            if change > 0.0 {
                gains[i] = change;
            } else {
                losses[i] = -change;
            }
        }

        let period = self.period as f64;
        for i in self.period..n {
            let window = i + 1 - self.period..=i;
            let avg_gain = gains[window.clone()].iter().sum::<f64>() / period;
            let avg_loss = losses[window].iter().sum::<f64>() / period;
            out[i] = Some(100.0 - 100.0 / (1.0 + avg_gain / (avg_loss + EPSILON)));
        }
        out
    }
}
