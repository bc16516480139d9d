// Module declarations
pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod market_data_provider;
pub(crate) mod market_data_service;
pub mod providers;

// Re-export the public interface
pub use market_data_model::{BenchmarkRates, Quote};
pub use market_data_provider::MarketDataProvider;
pub use market_data_service::MarketDataService;
pub use providers::MarketFunctionsProvider;

// Re-export error types for convenience
pub use market_data_errors::{MarketDataError, Result};
