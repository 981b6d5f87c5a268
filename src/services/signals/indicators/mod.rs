//! Technical indicator implementations.
//!
//! Every indicator returns a series aligned to its input index. Positions
//! inside an indicator's warm-up window are `None`.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod keltner;
pub mod rsi;
pub mod sma;
pub mod supertrend;

pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use ema::Ema;
pub use keltner::KeltnerChannel;
pub use rsi::Rsi;
pub use sma::{rolling_mean, rolling_std};
pub use supertrend::SupertrendLowerBand;

/// Upper/middle/lower envelope around a price series.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl Bands {
    /// Upper and lower band at `back` bars before the latest (0 = latest).
    pub fn at_back(&self, back: usize) -> Option<(f64, f64)> {
        Some((back_value(&self.upper, back)?, back_value(&self.lower, back)?))
    }
}

/// Value `back` positions before the last element (0 = last).
pub fn back_value(values: &[Option<f64>], back: usize) -> Option<f64> {
    let idx = values.len().checked_sub(back + 1)?;
    values[idx]
}
