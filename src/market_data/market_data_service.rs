use chrono::Utc;
use dashmap::DashMap;
use log::debug;
use std::sync::Arc;

use super::market_data_errors::{MarketDataError, Result};
use super::market_data_model::{BenchmarkRates, Quote};
use super::market_data_provider::MarketDataProvider;

/// How long a cached quote stays fresh
const QUOTE_TTL_SECONDS: i64 = 300;

/// Service for fetching quotes and benchmark rates, with an in-process
/// cache in front of the provider
pub struct MarketDataService {
    provider: Arc<dyn MarketDataProvider>,
    quote_cache: DashMap<String, Quote>,
}

impl MarketDataService {
    /// Creates a new MarketDataService instance
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            quote_cache: DashMap::new(),
        }
    }

    fn cached(&self, ticker: &str) -> Option<Quote> {
        let entry = self.quote_cache.get(ticker)?;
        let age = Utc::now().signed_duration_since(entry.fetched_at);
        if age.num_seconds() < QUOTE_TTL_SECONDS {
            Some(entry.clone())
        } else {
            None
        }
    }

    /// Latest quote for one ticker
    pub async fn get_quote(&self, ticker: &str) -> Result<Quote> {
        if let Some(quote) = self.cached(ticker) {
            return Ok(quote);
        }

        debug!("Fetching quote for {}", ticker);
        let quote = self.provider.get_quote(ticker).await?;
        self.quote_cache.insert(quote.ticker.clone(), quote.clone());
        Ok(quote)
    }

    /// Latest quotes for a set of tickers. Cached entries are served
    /// locally; the rest go to the provider in one call.
    pub async fn get_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>> {
        let mut quotes = Vec::with_capacity(tickers.len());
        let mut missing = Vec::new();

        for ticker in tickers {
            match self.cached(ticker) {
                Some(quote) => quotes.push(quote),
                None => missing.push(ticker.clone()),
            }
        }

        if !missing.is_empty() {
            let fetched = self.provider.get_quotes(&missing).await?;
            for quote in fetched {
                self.quote_cache.insert(quote.ticker.clone(), quote.clone());
                quotes.push(quote);
            }
        }

        Ok(quotes)
    }

    /// (ticker, price) pairs suitable for `InvestmentService::update_prices`
    pub async fn latest_prices(&self, tickers: &[String]) -> Result<Vec<(String, f64)>> {
        let quotes = self.get_quotes(tickers).await?;
        Ok(quotes
            .into_iter()
            .map(|quote| (quote.ticker, quote.price))
            .collect())
    }

    /// CDI/IPCA/SELIC annual rates
    pub async fn get_benchmark_rates(&self) -> Result<BenchmarkRates> {
        self.provider.get_benchmark_rates().await
    }

    /// Drops every cached quote
    pub fn clear_cache(&self) {
        self.quote_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn get_quote(&self, ticker: &str) -> std::result::Result<Quote, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Quote {
                ticker: ticker.to_string(),
                price: 10.0,
                change_percent: 0.0,
                volatility: None,
                fetched_at: Utc::now(),
            })
        }

        async fn get_quotes(
            &self,
            tickers: &[String],
        ) -> std::result::Result<Vec<Quote>, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(tickers
                .iter()
                .map(|ticker| Quote {
                    ticker: ticker.clone(),
                    price: 10.0,
                    change_percent: 0.0,
                    volatility: None,
                    fetched_at: Utc::now(),
                })
                .collect())
        }

        async fn get_benchmark_rates(
            &self,
        ) -> std::result::Result<BenchmarkRates, MarketDataError> {
            Ok(BenchmarkRates {
                cdi: 12.0,
                ipca: 4.5,
                selic: 12.25,
            })
        }
    }

    #[tokio::test]
    async fn repeated_quote_requests_hit_the_cache() {
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let service = MarketDataService::new(provider.clone());

        service.get_quote("PETR4").await.unwrap();
        service.get_quote("PETR4").await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
