use serde::{Deserialize, Serialize};

/// OHLCV (Open, High, Low, Close, Volume) bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    /// Bar open time, Unix milliseconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcPoint {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Price/volume history for one symbol, ordered by bar time.
///
/// Bars are kept in strictly increasing time order with no duplicate
/// timestamps; construction sorts the input and keeps the last bar seen
/// for any repeated timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<OhlcPoint>,
}

impl Series {
    /// Build a series from bars in any order.
    pub fn new(mut bars: Vec<OhlcPoint>) -> Self {
        // Stable sort keeps arrival order among equal timestamps, so the
        // reverse-dedup below retains the most recent arrival.
        bars.sort_by_key(|b| b.time);
        let mut out: Vec<OhlcPoint> = Vec::with_capacity(bars.len());
        for bar in bars {
            match out.last_mut() {
                Some(last) if last.time == bar.time => *last = bar,
                _ => out.push(bar),
            }
        }
        Self { bars: out }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcPoint] {
        &self.bars
    }

    pub fn last(&self) -> Option<&OhlcPoint> {
        self.bars.last()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}
