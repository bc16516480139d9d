use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;

use super::super::market_data_errors::MarketDataError;
use super::super::market_data_model::{BenchmarkRates, Quote};
use super::super::market_data_provider::MarketDataProvider;

/// HTTP client for the `market-data` serverless function. Requests
/// carry an `action` discriminator in the JSON body.
pub struct MarketFunctionsProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MarketFunctionsProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    async fn invoke(&self, body: serde_json::Value) -> Result<serde_json::Value, MarketDataError> {
        let url = format!("{}/functions/v1/market-data", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError(e.to_string()))?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MarketDataError::ProviderError(e.to_string()))?;

        if let Some(message) = payload["error"].as_str() {
            return Err(MarketDataError::ProviderError(message.to_string()));
        }

        Ok(payload)
    }

    fn parse_quote(&self, value: &serde_json::Value) -> Option<Quote> {
        let ticker = value["ticker"].as_str()?.to_string();
        let price = value["price"].as_f64()?;
        Some(Quote {
            ticker,
            price,
            change_percent: value["changePercent"].as_f64().unwrap_or(0.0),
            volatility: value["volatility"].as_f64(),
            fetched_at: Utc::now(),
        })
    }
}

#[async_trait]
impl MarketDataProvider for MarketFunctionsProvider {
    async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let payload = self
            .invoke(json!({ "action": "quote", "ticker": ticker }))
            .await?;

        self.parse_quote(&payload["quote"])
            .ok_or_else(|| MarketDataError::NoData(ticker.to_string()))
    }

    async fn get_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError> {
        if tickers.is_empty() {
            return Ok(Vec::new());
        }

        let payload = self
            .invoke(json!({ "action": "quotes", "tickers": tickers }))
            .await?;

        let quotes = payload["quotes"]
            .as_array()
            .ok_or_else(|| {
                MarketDataError::InvalidData("Missing quotes array in response".to_string())
            })?
            .iter()
            .filter_map(|value| self.parse_quote(value))
            .collect();

        Ok(quotes)
    }

    async fn get_benchmark_rates(&self) -> Result<BenchmarkRates, MarketDataError> {
        let payload = self.invoke(json!({ "action": "benchmarks" })).await?;

        let rates = &payload["rates"];
        Ok(BenchmarkRates {
            cdi: rates["cdi"].as_f64().unwrap_or(0.0),
            ipca: rates["ipca"].as_f64().unwrap_or(0.0),
            selic: rates["selic"].as_f64().unwrap_or(0.0),
        })
    }
}
