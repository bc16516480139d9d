use crate::investments::{
    ASSET_TYPE_CRYPTO, ASSET_TYPE_ETF, ASSET_TYPE_FIXED_INCOME, ASSET_TYPE_FUND, ASSET_TYPE_REIT,
    ASSET_TYPE_STOCK,
};

/// Annualized volatility (percent) assumed when no holding has
/// volatility data
pub const DEFAULT_VOLATILITY: f64 = 15.0;

/// Scenario multipliers applied to the expected monthly return
pub const PESSIMISTIC_MULTIPLIER: f64 = 0.5;
pub const MODERATE_MULTIPLIER: f64 = 1.0;
pub const OPTIMISTIC_MULTIPLIER: f64 = 1.5;

/// Expected monthly return (percent) per asset class, used by the
/// projection scenarios
pub const EXPECTED_MONTHLY_RETURNS: [(&str, f64); 6] = [
    (ASSET_TYPE_FIXED_INCOME, 0.9),
    (ASSET_TYPE_STOCK, 1.2),
    (ASSET_TYPE_REIT, 1.0),
    (ASSET_TYPE_CRYPTO, 2.0),
    (ASSET_TYPE_ETF, 1.1),
    (ASSET_TYPE_FUND, 0.8),
];

/// Monthly return assumed for asset classes missing from the table
pub const FALLBACK_MONTHLY_RETURN: f64 = 0.8;
