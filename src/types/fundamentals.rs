use serde::{Deserialize, Serialize};

/// Company metadata consumed by the quality/value screen.
///
/// Ratios follow the upstream convention: return on equity, growth rates and
/// dividend yield are fractions (0.18 = 18%), debt-to-equity is a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub return_on_equity: Option<f64>,
    pub debt_to_equity: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub current_price: Option<f64>,
    pub regular_market_price: Option<f64>,
}

impl Fundamentals {
    /// Last traded price, preferring the live quote over the regular-session one.
    /// Non-positive quotes are skipped.
    pub fn price(&self) -> f64 {
        self.current_price
            .filter(|p| *p > 0.0)
            .or(self.regular_market_price.filter(|p| *p > 0.0))
            .unwrap_or(0.0)
    }

    /// True when no field was populated.
    pub fn is_empty(&self) -> bool {
        *self == Fundamentals::default()
    }
}
