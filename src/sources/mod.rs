pub mod provider;
pub mod yahoo;

pub use provider::{HistoryBatch, MarketDataProvider};
pub use yahoo::YahooFinanceClient;
