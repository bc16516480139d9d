use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest quote for a ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticker: String,
    pub price: f64,
    pub change_percent: f64,
    /// Annualized volatility in percent, when the data source has it
    pub volatility: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

/// Brazilian reference rates, annual percents
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRates {
    pub cdi: f64,
    pub ipca: f64,
    pub selic: f64,
}
