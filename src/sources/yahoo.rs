//! Yahoo Finance API client for historical stock data and fundamentals.
//!
//! Uses the unofficial chart and quoteSummary endpoints. NSE symbols keep
//! their `.NS` exchange suffix.

use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::debug;

use super::provider::{HistoryBatch, MarketDataProvider};
use crate::error::{AppError, Result};
use crate::types::{Fundamentals, OhlcPoint};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

/// quoteSummary response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResponse {
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    result: Option<Vec<QuoteSummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    financial_data: FinancialData,
    #[serde(default)]
    summary_detail: SummaryDetail,
    #[serde(default)]
    price: PriceModule,
}

/// Yahoo wraps numbers as `{"raw": 0.18, "fmt": "18%"}`, or `{}` when absent.
#[derive(Debug, Default, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: &Option<RawValue>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    current_price: Option<RawValue>,
    return_on_equity: Option<RawValue>,
    debt_to_equity: Option<RawValue>,
    earnings_growth: Option<RawValue>,
    revenue_growth: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    regular_market_price: Option<RawValue>,
}

impl From<QuoteSummaryResult> for Fundamentals {
    fn from(r: QuoteSummaryResult) -> Self {
        Fundamentals {
            return_on_equity: raw(&r.financial_data.return_on_equity),
            debt_to_equity: raw(&r.financial_data.debt_to_equity),
            trailing_pe: raw(&r.summary_detail.trailing_pe),
            forward_pe: raw(&r.summary_detail.forward_pe),
            earnings_growth: raw(&r.financial_data.earnings_growth),
            revenue_growth: raw(&r.financial_data.revenue_growth),
            dividend_yield: raw(&r.summary_detail.dividend_yield),
            current_price: raw(&r.financial_data.current_price),
            regular_market_price: raw(&r.price.regular_market_price),
        }
    }
}

/// Normalize a symbol for use in a Yahoo URL path.
/// Exchange suffixes are kept; `&` (as in `M&M.NS`) is percent-encoded.
fn encode_yahoo_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('&', "%26")
}

/// Turn a chart quote block into bars.
///
/// Rows where every field is null are dropped, as are rows without a close.
/// Missing open/high/low fall back to the close; missing volume is zero.
fn quote_to_points(timestamps: &[i64], quote: YahooQuote) -> Vec<OhlcPoint> {
    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let field = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &timestamp)| {
            let close = field(&closes[..], i)?;
            if !close.is_finite() || close <= 0.0 {
                return None;
            }
            Some(OhlcPoint {
                time: timestamp * 1000,
                open: field(&opens[..], i).unwrap_or(close),
                high: field(&highs[..], i).unwrap_or(close),
                low: field(&lows[..], i).unwrap_or(close),
                close,
                volume: field(&volumes[..], i).unwrap_or(0.0),
            })
        })
        .collect()
}

/// Yahoo Finance API client.
///
/// Every request, whichever chunk it belongs to, takes a permit from a shared
/// semaphore, so at most `max_in_flight` requests hit Yahoo at once.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
    permits: Semaphore,
    symbol_timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a client. `symbol_timeout` bounds each single-symbol request,
    /// not counting time spent waiting for a permit.
    pub fn new(symbol_timeout: Duration, max_in_flight: usize) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            permits: Semaphore::new(max_in_flight.max(1)),
            symbol_timeout,
        })
    }

    /// Point the client at a different host (mirrors, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run one upstream request under a permit and the per-symbol timeout.
    async fn limited<T, F>(&self, request: F) -> Result<T>
    where
        F: std::future::Future<Output = Result<T>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;
        tokio::time::timeout(self.symbol_timeout, request)
            .await
            .map_err(|_| AppError::Timeout(self.symbol_timeout))?
    }

    /// Fetch historical bars for a symbol.
    ///
    /// Arguments:
    /// - symbol: Yahoo symbol including exchange suffix (e.g., "RELIANCE.NS")
    /// - range: Time range ("2d", "3mo", "1y", ...)
    /// - interval: Data interval ("5m", "1d", ...)
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        range: &str,
        interval: &str,
    ) -> Result<Vec<OhlcPoint>> {
        self.limited(self.request_chart(symbol, range, interval)).await
    }

    /// Fetch the fundamentals snapshot for a symbol.
    pub async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        self.limited(self.request_summary(symbol)).await
    }

    async fn request_chart(&self, symbol: &str, range: &str, interval: &str) -> Result<Vec<OhlcPoint>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url,
            encode_yahoo_symbol(symbol),
            range,
            interval
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo chart {} returned {}",
                symbol,
                response.status()
            )));
        }

        let data: YahooChartResponse = response.json().await?;

        if let Some(error) = data.chart.error {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            )));
        }

        let result = data
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| AppError::ExternalApi(format!("No chart result for {}", symbol)))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ExternalApi(format!("No quote data for {}", symbol)))?;

        Ok(quote_to_points(&timestamps, quote))
    }

    async fn request_summary(&self, symbol: &str) -> Result<Fundamentals> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=financialData,summaryDetail,price",
            self.base_url,
            encode_yahoo_symbol(symbol)
        );

        debug!("Fetching Yahoo quoteSummary: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo quoteSummary {} returned {}",
                symbol,
                response.status()
            )));
        }

        let data: QuoteSummaryResponse = response.json().await?;

        if let Some(error) = data.quote_summary.error {
            return Err(AppError::ExternalApi(format!(
                "Yahoo API error: {} - {}",
                error.code, error.description
            )));
        }

        data.quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .map(Fundamentals::from)
            .ok_or_else(|| AppError::ExternalApi(format!("No fundamentals for {}", symbol)))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    /// The chart endpoint is single-symbol, so a group is fanned out under the
    /// client's in-flight limit. A slow or failing symbol only loses itself;
    /// the group fails when no symbol returned data.
    async fn fetch_history(
        &self,
        symbols: &[String],
        period: &str,
        interval: &str,
    ) -> Result<HistoryBatch> {
        let responses = join_all(
            symbols
                .iter()
                .map(|s| self.get_historical_data(s, period, interval)),
        )
        .await;

        let mut batch = HistoryBatch::new();
        for (symbol, response) in symbols.iter().zip(responses) {
            match response {
                Ok(points) if !points.is_empty() => {
                    batch.insert(symbol.clone(), points);
                }
                Ok(_) => debug!("Yahoo returned no bars for {}", symbol),
                Err(e) => debug!("Yahoo history failed for {}: {}", symbol, e),
            }
        }

        if batch.is_empty() {
            return Err(AppError::ExternalApi(format!(
                "no history returned for {} symbols",
                symbols.len()
            )));
        }
        Ok(batch)
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        self.get_fundamentals(symbol).await
    }
}
