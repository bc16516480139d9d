// Module declarations
pub(crate) mod analytics_constants;
pub mod analytics_calculator;
pub(crate) mod analytics_model;
pub(crate) mod analytics_service;

// Re-export the public interface
pub use analytics_constants::*;
pub use analytics_model::{
    AssetTypeGains, CapitalGainsSummary, Projection, ProjectionPoint, ProjectionScenario,
    RiskReturn,
};
pub use analytics_service::AnalyticsService;
