//! Quality/value screen over company fundamentals.
//!
//! Unlike the price detectors this one reads [`Fundamentals`], not a
//! [`crate::types::Series`], so it exposes its own `evaluate`/`run` pair.

use tracing::debug;

use super::SymbolOutcome;
use crate::types::{Fundamentals, ScanType, Signal, SignalSide};

/// Debt-to-equity assumed when the provider does not report one.
const MISSING_DEBT_TO_EQUITY: f64 = 999.0;

/// Ratios normalised to percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    pub roe: f64,
    pub debt_to_equity: f64,
    pub trailing_pe: f64,
    pub forward_pe: f64,
    pub earnings_growth: f64,
    pub revenue_growth: f64,
    pub dividend_yield: f64,
    pub price: f64,
}

impl From<&Fundamentals> for QualityMetrics {
    fn from(f: &Fundamentals) -> Self {
        Self {
            roe: f.return_on_equity.unwrap_or(0.0) * 100.0,
            // Upstream reports zero leverage where the figure is unknown.
            debt_to_equity: f
                .debt_to_equity
                .filter(|d| *d != 0.0)
                .unwrap_or(MISSING_DEBT_TO_EQUITY),
            trailing_pe: f.trailing_pe.unwrap_or(0.0),
            forward_pe: f.forward_pe.unwrap_or(0.0),
            earnings_growth: f.earnings_growth.unwrap_or(0.0) * 100.0,
            revenue_growth: f.revenue_growth.unwrap_or(0.0) * 100.0,
            dividend_yield: f.dividend_yield.unwrap_or(0.0) * 100.0,
            price: f.price(),
        }
    }
}

impl QualityMetrics {
    /// Hard gate applied before scoring.
    pub fn passes_gate(&self) -> bool {
        self.roe > 15.0 && self.debt_to_equity < 100.0 && self.trailing_pe > 0.0 && self.price > 0.0
    }

    /// Weighted score out of 100.
    pub fn score(&self) -> u32 {
        let mut score = 0;
        if self.roe > 20.0 {
            score += 20;
        } else if self.roe > 15.0 {
            score += 12;
        }
        if self.debt_to_equity < 30.0 {
            score += 20;
        } else if self.debt_to_equity < 60.0 {
            score += 12;
        }
        if self.forward_pe > 0.0 && self.forward_pe < self.trailing_pe {
            score += 15;
        }
        if self.earnings_growth > 15.0 {
            score += 15;
        } else if self.earnings_growth > 10.0 {
            score += 8;
        }
        if self.revenue_growth > 10.0 {
            score += 10;
        }
        if self.dividend_yield > 1.5 {
            score += 10;
        }
        score
    }
}

pub struct QualityValueScore {
    pub min_score: u32,
    pub max_confidence: u32,
}

impl Default for QualityValueScore {
    fn default() -> Self {
        Self {
            min_score: 45,
            max_confidence: 90,
        }
    }
}

impl QualityValueScore {
    pub fn name(&self) -> &'static str {
        "Quality Value Score"
    }

    pub fn algo_type(&self) -> ScanType {
        ScanType::Longterm
    }

    pub fn evaluate(&self, symbol: &str, fundamentals: &Fundamentals) -> SymbolOutcome {
        let m = QualityMetrics::from(fundamentals);
        if !m.passes_gate() {
            return SymbolOutcome::Quiet;
        }
        let score = m.score();
        if score < self.min_score {
            return SymbolOutcome::Quiet;
        }

        let p = m.price;
        SymbolOutcome::Fired(
            Signal::builder(symbol, self.name(), self.algo_type(), SignalSide::Accumulate)
                .levels(p, p * 0.85, p * 1.20, p * 1.40)
                .confidence(score.min(self.max_confidence) as f64)
                .timeframe("Long-term (3-12 months)")
                .detail(format!(
                    "ROE {:.0}% | D/E {:.0} | EPS growth {:+.0}% | Score {}/100",
                    m.roe, m.debt_to_equity, m.earnings_growth, score
                ))
                .risk_reward("1:3")
                .tags(&["Quality", "Value", "Fundamental"])
                .build(),
        )
    }

    pub fn run(&self, universe: &[(String, Fundamentals)]) -> Vec<Signal> {
        let signals: Vec<Signal> = universe
            .iter()
            .filter_map(|(symbol, f)| self.evaluate(symbol, f).signal())
            .collect();
        debug!(
            "[{}] {} signals from {} symbols",
            self.name(),
            signals.len(),
            universe.len()
        );
        signals
    }
}
