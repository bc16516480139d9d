use thiserror::Error;

/// Custom error type for market data operations
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("No quote found for {0}")]
    NoData(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;
