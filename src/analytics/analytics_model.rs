use serde::{Deserialize, Serialize};

use super::analytics_constants::{
    MODERATE_MULTIPLIER, OPTIMISTIC_MULTIPLIER, PESSIMISTIC_MULTIPLIER,
};

/// Risk/return summary of a portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReturn {
    pub period_return_percent: f64,
    pub weighted_volatility: f64,
    pub sharpe_ratio: f64,
    pub risk_free_rate: f64,
}

/// The three projection scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectionScenario {
    Pessimistic,
    Moderate,
    Optimistic,
}

impl ProjectionScenario {
    pub fn multiplier(&self) -> f64 {
        match self {
            ProjectionScenario::Pessimistic => PESSIMISTIC_MULTIPLIER,
            ProjectionScenario::Moderate => MODERATE_MULTIPLIER,
            ProjectionScenario::Optimistic => OPTIMISTIC_MULTIPLIER,
        }
    }

    pub fn all() -> [ProjectionScenario; 3] {
        [
            ProjectionScenario::Pessimistic,
            ProjectionScenario::Moderate,
            ProjectionScenario::Optimistic,
        ]
    }
}

/// One projected month
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub month: u32,
    pub value: f64,
}

/// A full projection for one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub scenario: ProjectionScenario,
    pub monthly_return_percent: f64,
    pub points: Vec<ProjectionPoint>,
}

/// Gains rolled up for one asset type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetTypeGains {
    pub asset_type: String,
    pub total_invested: f64,
    pub current_value: f64,
    pub gain_value: f64,
    pub gain_percent: f64,
}

/// Capital gains summary for a portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsSummary {
    pub total_invested: f64,
    pub current_value: f64,
    pub gain_value: f64,
    pub gain_percent: f64,
    pub by_asset_type: Vec<AssetTypeGains>,
}
