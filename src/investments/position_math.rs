//! Pure position arithmetic shared by the application, redemption and
//! transfer flows. All computation goes through `Decimal` to keep the
//! weighted averages stable, with f64 at the edges to match the store.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use crate::constants::{DECIMAL_PRECISION, QUANTITY_THRESHOLD};

fn dec(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or_default()
}

fn out(value: Decimal) -> f64 {
    value.round_dp(DECIMAL_PRECISION).to_f64().unwrap_or(0.0)
}

/// Result of merging an application into an existing position
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPosition {
    pub quantity: f64,
    pub total_invested: f64,
    pub purchase_price: f64,
}

/// Result of removing quantity from a position proportionally
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedPosition {
    pub quantity: f64,
    pub total_invested: f64,
    pub current_value: f64,
}

impl ReducedPosition {
    /// True when the remaining position should be deleted
    pub fn is_closed(&self) -> bool {
        self.quantity <= QUANTITY_THRESHOLD || self.current_value <= 0.0
    }
}

/// Merges an application of `quantity` units at `unit_price` into a
/// position already holding `held_quantity` units bought for
/// `held_invested`, recomputing the weighted-average purchase price.
pub fn merge_application(
    held_quantity: f64,
    held_invested: f64,
    quantity: f64,
    unit_price: f64,
) -> MergedPosition {
    let new_quantity = dec(held_quantity) + dec(quantity);
    let new_invested = dec(held_invested) + dec(quantity) * dec(unit_price);
    let purchase_price = if new_quantity.is_zero() {
        Decimal::ZERO
    } else {
        new_invested / new_quantity
    };

    MergedPosition {
        quantity: out(new_quantity),
        total_invested: out(new_invested),
        purchase_price: out(purchase_price),
    }
}

/// Removes `quantity` units from a position holding `held_quantity`,
/// scaling invested amount and current value by (1 - q/Q).
pub fn reduce_position(
    held_quantity: f64,
    held_invested: f64,
    current_value: f64,
    quantity: f64,
) -> ReducedPosition {
    let held = dec(held_quantity);
    if held.is_zero() {
        return ReducedPosition {
            quantity: 0.0,
            total_invested: 0.0,
            current_value: 0.0,
        };
    }

    let remaining = Decimal::ONE - dec(quantity) / held;

    ReducedPosition {
        quantity: out(held - dec(quantity)),
        total_invested: out(dec(held_invested) * remaining),
        current_value: out(dec(current_value) * remaining),
    }
}

/// Gain over cost basis as a percentage. Zero when nothing is invested.
pub fn gain_percent(total_invested: f64, current_value: f64) -> f64 {
    let invested = dec(total_invested);
    if invested.is_zero() {
        return 0.0;
    }
    out((dec(current_value) - invested) / invested * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_recomputes_weighted_average_price() {
        // 10 units at 10.00, then 10 more at 20.00 -> average 15.00
        let merged = merge_application(10.0, 100.0, 10.0, 20.0);
        assert_eq!(merged.quantity, 20.0);
        assert_eq!(merged.total_invested, 300.0);
        assert_eq!(merged.purchase_price, 15.0);
    }

    #[test]
    fn merge_into_empty_position_uses_application_price() {
        let merged = merge_application(0.0, 0.0, 4.0, 25.0);
        assert_eq!(merged.quantity, 4.0);
        assert_eq!(merged.total_invested, 100.0);
        assert_eq!(merged.purchase_price, 25.0);
    }

    #[test]
    fn partial_redemption_scales_value_proportionally() {
        // Redeeming q of Q must leave V * (1 - q/Q)
        let reduced = reduce_position(10.0, 1000.0, 1200.0, 4.0);
        assert_eq!(reduced.quantity, 6.0);
        assert_eq!(reduced.total_invested, 600.0);
        assert_eq!(reduced.current_value, 720.0);
        assert!(!reduced.is_closed());
    }

    #[test]
    fn total_redemption_closes_the_position() {
        let reduced = reduce_position(10.0, 1000.0, 1200.0, 10.0);
        assert_eq!(reduced.quantity, 0.0);
        assert_eq!(reduced.current_value, 0.0);
        assert!(reduced.is_closed());
    }

    #[test]
    fn dust_quantity_counts_as_closed() {
        let reduced = reduce_position(10.0, 1000.0, 1200.0, 9.999999999);
        assert!(reduced.is_closed());
    }

    #[test]
    fn gain_percent_recomputes_from_cost_basis() {
        assert_eq!(gain_percent(1000.0, 1200.0), 20.0);
        assert_eq!(gain_percent(1000.0, 800.0), -20.0);
    }

    #[test]
    fn gain_percent_is_zero_without_cost_basis() {
        assert_eq!(gain_percent(0.0, 500.0), 0.0);
    }
}
