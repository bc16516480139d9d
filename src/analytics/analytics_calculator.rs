//! Closed-form analytics over a portfolio's positions. Everything here
//! is pure: the service layer feeds it already-fetched data.

use crate::investments::{position_math, Investment};

use super::analytics_constants::{
    DEFAULT_VOLATILITY, EXPECTED_MONTHLY_RETURNS, FALLBACK_MONTHLY_RETURN,
};
use super::analytics_model::{
    AssetTypeGains, CapitalGainsSummary, Projection, ProjectionPoint, ProjectionScenario,
};

/// Value-weighted mean of per-asset volatilities. Positions without
/// volatility data are left out of the weighting; when none has data the
/// portfolio falls back to the default.
pub fn weighted_volatility(holdings: &[(f64, Option<f64>)]) -> f64 {
    let known: Vec<(f64, f64)> = holdings
        .iter()
        .filter_map(|(value, volatility)| volatility.map(|v| (*value, v)))
        .collect();

    let total_value: f64 = known.iter().map(|(value, _)| value).sum();
    if known.is_empty() || total_value == 0.0 {
        return DEFAULT_VOLATILITY;
    }

    known
        .iter()
        .map(|(value, volatility)| value / total_value * volatility)
        .sum()
}

/// Sharpe ratio: excess return over the risk-free rate per unit of
/// volatility. Defined as zero when volatility is zero.
pub fn sharpe_ratio(return_percent: f64, risk_free_rate: f64, volatility: f64) -> f64 {
    if volatility == 0.0 {
        return 0.0;
    }
    (return_percent - risk_free_rate) / volatility
}

/// Expected monthly return (percent) for an asset class
pub fn expected_monthly_return(asset_type: &str) -> f64 {
    EXPECTED_MONTHLY_RETURNS
        .iter()
        .find(|(class, _)| *class == asset_type)
        .map(|(_, rate)| *rate)
        .unwrap_or(FALLBACK_MONTHLY_RETURN)
}

/// Value-weighted expected monthly return (percent) of a set of
/// positions. Zero for an empty portfolio.
pub fn portfolio_monthly_return(positions: &[Investment]) -> f64 {
    let total_value: f64 = positions.iter().map(|p| p.current_value).sum();
    if total_value == 0.0 {
        return 0.0;
    }

    positions
        .iter()
        .map(|p| p.current_value / total_value * expected_monthly_return(&p.asset_type))
        .sum()
}

/// Projects a starting value over `months`, compounding the monthly
/// return scaled by the scenario multiplier and adding the contribution
/// after each month's growth.
pub fn project(
    scenario: ProjectionScenario,
    initial_value: f64,
    monthly_contribution: f64,
    monthly_return_percent: f64,
    months: u32,
) -> Projection {
    let growth = 1.0 + monthly_return_percent / 100.0 * scenario.multiplier();

    let mut points = Vec::with_capacity(months as usize + 1);
    let mut value = initial_value;
    points.push(ProjectionPoint { month: 0, value });

    for month in 1..=months {
        value = value * growth + monthly_contribution;
        points.push(ProjectionPoint { month, value });
    }

    Projection {
        scenario,
        monthly_return_percent,
        points,
    }
}

/// Rolls positions up into an overall and per-asset-type gains summary
pub fn capital_gains(positions: &[Investment]) -> CapitalGainsSummary {
    let mut by_asset_type: Vec<AssetTypeGains> = Vec::new();

    for position in positions {
        match by_asset_type
            .iter_mut()
            .find(|entry| entry.asset_type == position.asset_type)
        {
            Some(entry) => {
                entry.total_invested += position.total_invested;
                entry.current_value += position.current_value;
            }
            None => by_asset_type.push(AssetTypeGains {
                asset_type: position.asset_type.clone(),
                total_invested: position.total_invested,
                current_value: position.current_value,
                gain_value: 0.0,
                gain_percent: 0.0,
            }),
        }
    }

    for entry in &mut by_asset_type {
        entry.gain_value = entry.current_value - entry.total_invested;
        entry.gain_percent = position_math::gain_percent(entry.total_invested, entry.current_value);
    }
    by_asset_type.sort_by(|a, b| b.current_value.total_cmp(&a.current_value));

    let total_invested: f64 = positions.iter().map(|p| p.total_invested).sum();
    let current_value: f64 = positions.iter().map(|p| p.current_value).sum();

    CapitalGainsSummary {
        total_invested,
        current_value,
        gain_value: current_value - total_invested,
        gain_percent: position_math::gain_percent(total_invested, current_value),
        by_asset_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investments::{ASSET_TYPE_FIXED_INCOME, ASSET_TYPE_STOCK};
    use chrono::Utc;

    fn position(asset_type: &str, total_invested: f64, current_value: f64) -> Investment {
        let now = Utc::now().naive_utc();
        Investment {
            id: "i1".to_string(),
            portfolio_id: "p1".to_string(),
            asset_name: asset_type.to_string(),
            asset_type: asset_type.to_string(),
            ticker: None,
            quantity: 1.0,
            purchase_price: total_invested,
            current_price: current_value,
            total_invested,
            current_value,
            gain_percent: 0.0,
            source: "MANUAL".to_string(),
            maturity_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn weighted_volatility_is_the_value_weighted_sum() {
        // 30% weight at 10 vol + 70% weight at 20 vol = 17
        let holdings = vec![(300.0, Some(10.0)), (700.0, Some(20.0))];
        assert!((weighted_volatility(&holdings) - 17.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_volatility_ignores_unknown_holdings() {
        let holdings = vec![(500.0, Some(12.0)), (500.0, None)];
        assert!((weighted_volatility(&holdings) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_volatility_falls_back_when_nothing_is_known() {
        let holdings = vec![(500.0, None), (500.0, None)];
        assert_eq!(weighted_volatility(&holdings), DEFAULT_VOLATILITY);
        assert_eq!(weighted_volatility(&[]), DEFAULT_VOLATILITY);
    }

    #[test]
    fn sharpe_ratio_is_excess_return_over_volatility() {
        assert!((sharpe_ratio(18.0, 12.0, 15.0) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn sharpe_ratio_is_zero_at_zero_volatility() {
        assert_eq!(sharpe_ratio(18.0, 12.0, 0.0), 0.0);
    }

    #[test]
    fn projection_compounds_month_over_month() {
        let projection = project(ProjectionScenario::Moderate, 1000.0, 0.0, 1.0, 3);

        assert_eq!(projection.points.len(), 4);
        for window in projection.points.windows(2) {
            let expected = window[0].value * 1.01;
            assert!((window[1].value - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn projection_adds_contribution_after_growth() {
        let projection = project(ProjectionScenario::Moderate, 1000.0, 100.0, 1.0, 1);
        assert!((projection.points[1].value - (1000.0 * 1.01 + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn scenarios_stay_ordered_for_positive_returns() {
        let [pessimistic, moderate, optimistic] = ProjectionScenario::all().map(|scenario| {
            project(scenario, 1000.0, 100.0, 1.0, 12)
                .points
                .last()
                .unwrap()
                .value
        });

        assert!(pessimistic <= moderate);
        assert!(moderate <= optimistic);
    }

    #[test]
    fn capital_gains_roll_up_by_asset_type() {
        let positions = vec![
            position(ASSET_TYPE_STOCK, 1000.0, 1300.0),
            position(ASSET_TYPE_STOCK, 500.0, 400.0),
            position(ASSET_TYPE_FIXED_INCOME, 2000.0, 2100.0),
        ];

        let summary = capital_gains(&positions);
        assert_eq!(summary.total_invested, 3500.0);
        assert_eq!(summary.current_value, 3800.0);
        assert_eq!(summary.gain_value, 300.0);
        assert_eq!(summary.by_asset_type.len(), 2);

        let stocks = summary
            .by_asset_type
            .iter()
            .find(|entry| entry.asset_type == ASSET_TYPE_STOCK)
            .unwrap();
        assert_eq!(stocks.total_invested, 1500.0);
        assert_eq!(stocks.current_value, 1700.0);
    }
}
