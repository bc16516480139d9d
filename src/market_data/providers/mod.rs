pub(crate) mod market_functions_provider;

pub use market_functions_provider::MarketFunctionsProvider;
