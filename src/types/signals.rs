use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::universe::clean_symbol;

/// Scan family. Selects which detectors run and at what data granularity.
///
/// Also used as the informational holding-style label on each [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Intraday,
    Swing,
    Longterm,
}

impl ScanType {
    pub const ALL: [ScanType; 3] = [ScanType::Intraday, ScanType::Swing, ScanType::Longterm];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Intraday => "intraday",
            ScanType::Swing => "swing",
            ScanType::Longterm => "longterm",
        }
    }
}

impl FromStr for ScanType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intraday" => Ok(ScanType::Intraday),
            "swing" => Ok(ScanType::Swing),
            "longterm" => Ok(ScanType::Longterm),
            _ => Err(AppError::BadRequest(
                "type must be intraday, swing, or longterm".to_string(),
            )),
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trade side of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalSide {
    Buy,
    Sell,
    Short,
    Accumulate,
}

impl SignalSide {
    /// +1 for long-biased sides, -1 for short-biased ones.
    pub fn direction(&self) -> f64 {
        match self {
            SignalSide::Buy | SignalSide::Accumulate => 1.0,
            SignalSide::Sell | SignalSide::Short => -1.0,
        }
    }
}

/// A single trade signal emitted by a detector.
///
/// Only constructible through [`SignalBuilder`], which owns the rounding
/// (prices to one decimal) and clamping (confidence into 0..=100) rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    symbol: String,
    algorithm: String,
    algo_type: ScanType,
    signal: SignalSide,
    entry: f64,
    stop_loss: f64,
    target_1: f64,
    target_2: f64,
    confidence: u8,
    timeframe: String,
    detail: String,
    risk_reward: String,
    tags: Vec<String>,
}

impl Signal {
    pub fn builder(
        symbol: &str,
        algorithm: &str,
        algo_type: ScanType,
        side: SignalSide,
    ) -> SignalBuilder {
        SignalBuilder {
            symbol: clean_symbol(symbol).to_string(),
            algorithm: algorithm.to_string(),
            algo_type,
            side,
            levels: (0.0, 0.0, 0.0, 0.0),
            confidence: 0.0,
            timeframe: String::new(),
            detail: String::new(),
            risk_reward: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn algo_type(&self) -> ScanType {
        self.algo_type
    }

    pub fn side(&self) -> SignalSide {
        self.signal
    }

    pub fn entry(&self) -> f64 {
        self.entry
    }

    pub fn stop_loss(&self) -> f64 {
        self.stop_loss
    }

    pub fn target_1(&self) -> f64 {
        self.target_1
    }

    pub fn target_2(&self) -> f64 {
        self.target_2
    }

    pub fn confidence(&self) -> u8 {
        self.confidence
    }

    pub fn timeframe(&self) -> &str {
        &self.timeframe
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn risk_reward(&self) -> &str {
        &self.risk_reward
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Deduplication key.
    pub fn key(&self) -> (&str, &str) {
        (&self.symbol, &self.algorithm)
    }
}

/// Builder for [`Signal`].
#[derive(Debug, Clone)]
pub struct SignalBuilder {
    symbol: String,
    algorithm: String,
    algo_type: ScanType,
    side: SignalSide,
    levels: (f64, f64, f64, f64),
    confidence: f64,
    timeframe: String,
    detail: String,
    risk_reward: String,
    tags: Vec<String>,
}

impl SignalBuilder {
    /// Entry, stop-loss, first and second target.
    pub fn levels(mut self, entry: f64, stop_loss: f64, target_1: f64, target_2: f64) -> Self {
        self.levels = (entry, stop_loss, target_1, target_2);
        self
    }

    /// Raw confidence score; truncated toward zero and clamped on build.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn timeframe(mut self, timeframe: &str) -> Self {
        self.timeframe = timeframe.to_string();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    pub fn risk_reward(mut self, risk_reward: &str) -> Self {
        self.risk_reward = risk_reward.to_string();
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn build(self) -> Signal {
        let (entry, stop_loss, target_1, target_2) = self.levels;
        Signal {
            symbol: self.symbol,
            algorithm: self.algorithm,
            algo_type: self.algo_type,
            signal: self.side,
            entry: round_price(entry),
            stop_loss: round_price(stop_loss),
            target_1: round_price(target_1),
            target_2: round_price(target_2),
            confidence: clamp_confidence(self.confidence),
            timeframe: self.timeframe,
            detail: self.detail,
            risk_reward: self.risk_reward,
            tags: self.tags,
        }
    }
}

/// Round a price to one decimal place.
pub fn round_price(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Truncate toward zero and clamp into 0..=100. NaN maps to 0.
pub fn clamp_confidence(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.trunc().clamp(0.0, 100.0) as u8
}

/// Outcome of one scan, cached and returned as-is to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResult {
    pub scan_type: ScanType,
    /// Ranked by confidence, descending.
    pub signals: Vec<Signal>,
    pub count: usize,
    /// Size of the configured universe.
    pub universe: usize,
    pub scanned_at: DateTime<FixedOffset>,
    pub market_note: String,
}

pub const MARKET_NOTE: &str =
    "Live data via Yahoo Finance. Nifty 500 universe. Educational purposes only.";

impl ScanResult {
    pub fn new(
        scan_type: ScanType,
        signals: Vec<Signal>,
        universe: usize,
        scanned_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            scan_type,
            count: signals.len(),
            signals,
            universe,
            scanned_at,
            market_note: MARKET_NOTE.to_string(),
        }
    }
}
