/// Base currency for all monetary amounts
pub const BASE_CURRENCY: &str = "BRL";

/// Quantity below which a position is considered fully redeemed
pub const QUANTITY_THRESHOLD: f64 = 0.000_000_01;

/// Decimal precision for position arithmetic
pub const DECIMAL_PRECISION: u32 = 6;
