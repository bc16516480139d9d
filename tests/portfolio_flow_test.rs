use kadig_core::investments::{
    InvestmentError, InvestmentService, InvestmentServiceTrait, NewApplication, NewRedemption,
    NewTransfer, RedemptionOutcome, ASSET_TYPE_STOCK,
};
use kadig_core::movements::{
    MovementService, NewMovement, MOVEMENT_TYPE_APPLICATION, MOVEMENT_TYPE_REDEMPTION,
    MOVEMENT_TYPE_TRANSFER_IN, MOVEMENT_TYPE_TRANSFER_OUT,
};
use kadig_core::portfolios::{NewPortfolio, PortfolioService};
use kadig_core::profiles::{NewProfile, ProfileService};

mod common;

fn application(portfolio_id: &str, ticker: &str, quantity: f64, unit_price: f64) -> NewApplication {
    NewApplication {
        portfolio_id: portfolio_id.to_string(),
        asset_name: ticker.to_string(),
        asset_type: ASSET_TYPE_STOCK.to_string(),
        ticker: Some(ticker.to_string()),
        quantity,
        unit_price,
        source: None,
        maturity_date: None,
    }
}

#[test]
fn first_portfolio_becomes_primary_and_selected() {
    let pool = common::setup_pool("first_portfolio_primary");
    let service = PortfolioService::new(pool);

    let first = service
        .create_portfolio(NewPortfolio {
            id: None,
            name: "Carteira Principal".to_string(),
        })
        .unwrap();
    let second = service
        .create_portfolio(NewPortfolio {
            id: None,
            name: "Reserva".to_string(),
        })
        .unwrap();

    assert!(first.is_primary);
    assert!(first.is_selected);
    assert!(!second.is_primary);

    // Moving the primary flag clears it on the first portfolio
    service.set_primary(&second.id).unwrap();
    assert!(service.get_portfolio(&second.id).unwrap().is_primary);
    assert!(!service.get_portfolio(&first.id).unwrap().is_primary);
    assert_eq!(
        service.get_primary_portfolio().unwrap().unwrap().id,
        second.id
    );
}

#[test]
fn applications_merge_with_weighted_average_price() -> anyhow::Result<()> {
    let pool = common::setup_pool("apply_weighted_average");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool.clone());
    let movement_service = MovementService::new(pool);

    let portfolio = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Carteira".to_string(),
    })?;

    investment_service.apply(application(&portfolio.id, "PETR4", 10.0, 10.0))?;
    let merged = investment_service.apply(application(&portfolio.id, "PETR4", 10.0, 20.0))?;

    assert_eq!(merged.quantity, 20.0);
    assert_eq!(merged.total_invested, 300.0);
    assert_eq!(merged.purchase_price, 15.0);

    // Both applications land in the ledger
    let movements = movement_service.get_movements_by_portfolio(&portfolio.id)?;
    assert_eq!(movements.len(), 2);
    assert!(movements
        .iter()
        .all(|m| m.movement_type == MOVEMENT_TYPE_APPLICATION));

    // Only one position exists for the ticker
    assert_eq!(investment_service.get_investments(&portfolio.id)?.len(), 1);

    Ok(())
}

#[test]
fn applying_into_a_missing_portfolio_reports_not_found() {
    let pool = common::setup_pool("apply_missing_portfolio");
    let investment_service = InvestmentService::new(pool);

    let err = investment_service
        .apply(application("no-such-portfolio", "PETR4", 1.0, 10.0))
        .unwrap_err();
    assert!(matches!(err, InvestmentError::NotFound(_)));
}

#[test]
fn record_many_appends_all_rows_and_rejects_unknown_types() -> anyhow::Result<()> {
    let pool = common::setup_pool("ledger_record_many");
    let portfolio_service = PortfolioService::new(pool.clone());
    let movement_service = MovementService::new(pool);

    let portfolio = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Carteira".to_string(),
    })?;

    let row = |movement_type: &str, quantity: f64, unit_price: f64| NewMovement {
        portfolio_id: portfolio.id.clone(),
        movement_type: movement_type.to_string(),
        asset_name: "PETR4".to_string(),
        ticker: Some("PETR4".to_string()),
        quantity,
        unit_price,
        from_portfolio_name: None,
        to_portfolio_name: None,
        movement_date: None,
    };

    let inserted = movement_service.record_many(vec![
        row(MOVEMENT_TYPE_APPLICATION, 10.0, 30.0),
        row(MOVEMENT_TYPE_REDEMPTION, 4.0, 32.0),
    ])?;
    assert_eq!(inserted, 2);

    let movements = movement_service.get_movements_by_portfolio(&portfolio.id)?;
    assert_eq!(movements.len(), 2);
    let application_row = movements
        .iter()
        .find(|m| m.movement_type == MOVEMENT_TYPE_APPLICATION)
        .unwrap();
    assert_eq!(application_row.total_value, 300.0);

    // A batch with an unknown type is rejected before anything lands
    let result = movement_service.record_many(vec![
        row(MOVEMENT_TYPE_APPLICATION, 1.0, 30.0),
        row("DIVIDEND", 1.0, 30.0),
    ]);
    assert!(result.is_err());
    assert_eq!(movement_service.get_movements_by_portfolio(&portfolio.id)?.len(), 2);

    Ok(())
}

#[test]
fn partial_redemption_reduces_proportionally_and_full_redemption_deletes() -> anyhow::Result<()> {
    let pool = common::setup_pool("redemption_math");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool.clone());
    let movement_service = MovementService::new(pool);

    let portfolio = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Carteira".to_string(),
    })?;

    let position = investment_service.apply(application(&portfolio.id, "VALE3", 10.0, 100.0))?;

    // Redeem 4 of 10: everything scales by 0.6
    let outcome = investment_service.redeem(NewRedemption {
        investment_id: position.id.clone(),
        quantity: 4.0,
    })?;
    let remaining = match outcome {
        RedemptionOutcome::Partial(investment) => investment,
        RedemptionOutcome::Closed { .. } => panic!("partial redemption closed the position"),
    };
    assert_eq!(remaining.quantity, 6.0);
    assert_eq!(remaining.total_invested, 600.0);
    assert_eq!(remaining.current_value, 600.0);

    // Redeeming more than held is rejected
    assert!(investment_service
        .redeem(NewRedemption {
            investment_id: position.id.clone(),
            quantity: 7.0,
        })
        .is_err());

    // Redeeming the rest deletes the row
    let outcome = investment_service.redeem(NewRedemption {
        investment_id: position.id.clone(),
        quantity: 6.0,
    })?;
    assert!(matches!(outcome, RedemptionOutcome::Closed { .. }));
    assert!(investment_service.get_investment(&position.id).is_err());

    let redemptions = movement_service.search(
        Some(portfolio.id.as_str()),
        Some(MOVEMENT_TYPE_REDEMPTION),
        None,
        None,
    )?;
    assert_eq!(redemptions.len(), 2);

    Ok(())
}

#[test]
fn transfer_preserves_cost_basis_and_writes_both_ledger_rows() -> anyhow::Result<()> {
    let pool = common::setup_pool("transfer_flow");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool.clone());
    let movement_service = MovementService::new(pool);

    let origin = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Origem".to_string(),
    })?;
    let destination = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Destino".to_string(),
    })?;

    let position = investment_service.apply(application(&origin.id, "ITUB4", 10.0, 30.0))?;

    let transferred = investment_service.transfer(NewTransfer {
        investment_id: position.id.clone(),
        to_portfolio_id: destination.id.clone(),
        quantity: 4.0,
    })?;

    // Cost basis moves proportionally: 4/10 of 300 invested
    assert_eq!(transferred.portfolio_id, destination.id);
    assert_eq!(transferred.quantity, 4.0);
    assert_eq!(transferred.total_invested, 120.0);
    assert_eq!(transferred.purchase_price, 30.0);

    let remaining = investment_service.get_investment(&position.id)?;
    assert_eq!(remaining.quantity, 6.0);
    assert_eq!(remaining.total_invested, 180.0);

    let out_rows = movement_service.search(
        Some(origin.id.as_str()),
        Some(MOVEMENT_TYPE_TRANSFER_OUT),
        None,
        None,
    )?;
    let in_rows = movement_service.search(
        Some(destination.id.as_str()),
        Some(MOVEMENT_TYPE_TRANSFER_IN),
        None,
        None,
    )?;
    assert_eq!(out_rows.len(), 1);
    assert_eq!(in_rows.len(), 1);
    assert_eq!(out_rows[0].from_portfolio_name.as_deref(), Some("Origem"));
    assert_eq!(out_rows[0].to_portfolio_name.as_deref(), Some("Destino"));

    // Transferring into the same portfolio is rejected
    assert!(investment_service
        .transfer(NewTransfer {
            investment_id: remaining.id,
            to_portfolio_id: origin.id.clone(),
            quantity: 1.0,
        })
        .is_err());

    Ok(())
}

#[test]
fn refresh_totals_updates_portfolio_and_records_snapshot() -> anyhow::Result<()> {
    let pool = common::setup_pool("refresh_totals");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool);

    let portfolio = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Carteira".to_string(),
    })?;

    investment_service.apply(application(&portfolio.id, "BBAS3", 10.0, 25.0))?;
    investment_service.update_prices(&[("BBAS3".to_string(), 30.0)])?;

    let refreshed = portfolio_service.refresh_totals(&portfolio.id)?;
    assert_eq!(refreshed.total_value, 300.0);
    assert_eq!(refreshed.total_gain, 50.0);

    // The day's snapshot is upserted, not duplicated
    portfolio_service.refresh_totals(&portfolio.id)?;
    let history = portfolio_service.get_history(&portfolio.id)?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total_value, 300.0);

    Ok(())
}

#[test]
fn deleting_a_portfolio_removes_its_positions_but_keeps_movements() -> anyhow::Result<()> {
    let pool = common::setup_pool("delete_portfolio");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool.clone());
    let movement_service = MovementService::new(pool);

    let portfolio = portfolio_service.create_portfolio(NewPortfolio {
        id: None,
        name: "Carteira".to_string(),
    })?;
    investment_service.apply(application(&portfolio.id, "WEGE3", 5.0, 40.0))?;

    portfolio_service.delete_portfolio(&portfolio.id)?;

    assert!(portfolio_service.get_portfolio(&portfolio.id).is_err());
    assert!(investment_service.get_investments(&portfolio.id)?.is_empty());
    assert_eq!(
        movement_service.get_movements_by_portfolio(&portfolio.id)?.len(),
        1
    );

    Ok(())
}

#[test]
fn onboarding_profile_is_set_once() {
    let pool = common::setup_pool("profile_set_once");
    let service = ProfileService::new(pool);

    let profile = NewProfile {
        user_id: "user-1".to_string(),
        full_name: "Maria Silva".to_string(),
        investor_profile: "moderado".to_string(),
        risk_tolerance: "media".to_string(),
    };

    service.create_profile(profile.clone()).unwrap();
    assert!(service.create_profile(profile).is_err());

    let stored = service.get_profile("user-1").unwrap();
    assert_eq!(stored.investor_profile, "moderado");
}
