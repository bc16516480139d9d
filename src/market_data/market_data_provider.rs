use async_trait::async_trait;

use super::market_data_errors::MarketDataError;
use super::market_data_model::{BenchmarkRates, Quote};

/// Client contract for the external `market-data` function
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError>;

    /// Fetch latest quotes for multiple tickers in one round trip
    async fn get_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError>;

    async fn get_benchmark_rates(&self) -> Result<BenchmarkRates, MarketDataError>;
}
