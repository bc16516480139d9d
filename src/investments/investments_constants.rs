/// Position sources
///
/// Positions are either entered by hand or imported from a linked
/// Open-Finance institution.
/// Position created through the application flow.
pub const SOURCE_MANUAL: &str = "MANUAL";

/// Position imported from a Pluggy-linked institution.
pub const SOURCE_PLUGGY: &str = "PLUGGY";

/// Asset types
pub const ASSET_TYPE_STOCK: &str = "STOCK";
pub const ASSET_TYPE_REIT: &str = "REIT";
pub const ASSET_TYPE_FIXED_INCOME: &str = "FIXED_INCOME";
pub const ASSET_TYPE_CRYPTO: &str = "CRYPTO";
pub const ASSET_TYPE_ETF: &str = "ETF";
pub const ASSET_TYPE_FUND: &str = "FUND";

/// Asset types eligible for ticker-based quotes
pub const QUOTED_ASSET_TYPES: [&str; 4] = [
    ASSET_TYPE_STOCK,
    ASSET_TYPE_REIT,
    ASSET_TYPE_CRYPTO,
    ASSET_TYPE_ETF,
];
