//! Exponential Moving Average (EMA) indicator.

/// EMA (Exponential Moving Average) indicator.
///
/// Smoothing factor is `2 / (span + 1)` and the average is seeded with the
/// first value, so every position is defined.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.span as f64 + 1.0)
    }

    pub fn compute(&self, values: &[f64]) -> Vec<f64> {
        let alpha = self.alpha();
        let mut out = Vec::with_capacity(values.len());
        let mut prev: Option<f64> = None;
        for &v in values {
            let next = match prev {
                Some(p) => alpha * v + (1.0 - alpha) * p,
                None => v,
            };
            out.push(next);
            prev = Some(next);
        }
        out
    }
}
