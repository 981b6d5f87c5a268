//! Trading signals service module.
//!
//! Provides technical indicator calculations and the detectors that turn
//! them into trade signals.

pub mod detectors;
pub mod indicators;

pub use detectors::{
    BollingerSqueeze, Detector, EmaCrossover, FiftyTwoWeekBreakout, OpeningRangeBreakout,
    QualityValueScore, RsiOversoldBounce, SkipReason, SupertrendEma, SymbolOutcome,
};
