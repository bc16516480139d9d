use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use kadig_core::analytics::AnalyticsService;
use kadig_core::investments::{
    InvestmentService, InvestmentServiceTrait, NewApplication, ASSET_TYPE_FIXED_INCOME,
    ASSET_TYPE_STOCK,
};
use kadig_core::market_data::{
    BenchmarkRates, MarketDataError, MarketDataProvider, MarketDataService, Quote,
};
use kadig_core::portfolios::{NewPortfolio, PortfolioService};
use kadig_core::schema::portfolio_history;

mod common;

/// Provider serving fixed volatilities per ticker and a configurable
/// CDI rate.
struct StaticMarketProvider {
    cdi: f64,
}

impl StaticMarketProvider {
    fn quote(ticker: &str) -> Quote {
        let volatility = match ticker {
            "PETR4" => 10.0,
            "ITUB4" => 20.0,
            _ => 99.0,
        };
        Quote {
            ticker: ticker.to_string(),
            price: 10.0,
            change_percent: 0.0,
            volatility: Some(volatility),
            fetched_at: chrono::Utc::now(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for StaticMarketProvider {
    async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        Ok(Self::quote(ticker))
    }

    async fn get_quotes(&self, tickers: &[String]) -> Result<Vec<Quote>, MarketDataError> {
        Ok(tickers.iter().map(|t| Self::quote(t)).collect())
    }

    async fn get_benchmark_rates(&self) -> Result<BenchmarkRates, MarketDataError> {
        Ok(BenchmarkRates {
            cdi: self.cdi,
            ipca: 4.5,
            selic: self.cdi,
        })
    }
}

fn application(
    portfolio_id: &str,
    asset_type: &str,
    ticker: &str,
    quantity: f64,
    unit_price: f64,
) -> NewApplication {
    NewApplication {
        portfolio_id: portfolio_id.to_string(),
        asset_name: ticker.to_string(),
        asset_type: asset_type.to_string(),
        ticker: Some(ticker.to_string()),
        quantity,
        unit_price,
        source: None,
        maturity_date: None,
    }
}

fn analytics(pool: Arc<kadig_core::db::DbPool>, cdi: f64) -> AnalyticsService {
    let market_data = Arc::new(MarketDataService::new(Arc::new(StaticMarketProvider {
        cdi,
    })));
    AnalyticsService::new(pool, market_data)
}

fn snapshot(
    pool: &Arc<kadig_core::db::DbPool>,
    portfolio_id: &str,
    date: &str,
    total_value: f64,
) {
    let mut conn = kadig_core::db::get_connection(pool).unwrap();
    diesel::insert_into(portfolio_history::table)
        .values((
            portfolio_history::id.eq(format!("{}-{}", portfolio_id, date)),
            portfolio_history::portfolio_id.eq(portfolio_id),
            portfolio_history::date.eq(date),
            portfolio_history::total_value.eq(total_value),
            portfolio_history::total_gain.eq(0.0),
        ))
        .execute(&mut conn)
        .unwrap();
}

#[tokio::test]
async fn risk_return_weights_volatility_over_quoted_holdings_only() {
    let pool = common::setup_pool("risk_return_weights");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool.clone());

    let portfolio = portfolio_service
        .create_portfolio(NewPortfolio {
            id: None,
            name: "Carteira".to_string(),
        })
        .unwrap();

    // 300 at vol 10 and 700 at vol 20; the fixed-income position has a
    // ticker but no quote coverage and must stay out of the weighting
    investment_service
        .apply(application(&portfolio.id, ASSET_TYPE_STOCK, "PETR4", 10.0, 30.0))
        .unwrap();
    investment_service
        .apply(application(&portfolio.id, ASSET_TYPE_STOCK, "ITUB4", 70.0, 10.0))
        .unwrap();
    investment_service
        .apply(application(
            &portfolio.id,
            ASSET_TYPE_FIXED_INCOME,
            "CDB123",
            1.0,
            1000.0,
        ))
        .unwrap();

    let service = analytics(pool, 12.0);
    let summary = service.risk_return(&portfolio.id).await.unwrap();

    assert!((summary.weighted_volatility - 17.0).abs() < 1e-9);
    assert_eq!(summary.risk_free_rate, 12.0);
    // No snapshots yet, so the period return is flat and Sharpe is the
    // negative risk-free excess
    assert_eq!(summary.period_return_percent, 0.0);
    assert!((summary.sharpe_ratio - (-12.0 / 17.0)).abs() < 1e-9);
}

#[tokio::test]
async fn update_cdi_percent_persists_the_period_return_relative_to_cdi() {
    let pool = common::setup_pool("update_cdi_percent");
    let portfolio_service = PortfolioService::new(pool.clone());

    let portfolio = portfolio_service
        .create_portfolio(NewPortfolio {
            id: None,
            name: "Carteira".to_string(),
        })
        .unwrap();

    // 10% over the period against a 12% CDI
    snapshot(&pool, &portfolio.id, "2026-01-01", 1000.0);
    snapshot(&pool, &portfolio.id, "2026-02-01", 1100.0);

    let service = analytics(pool.clone(), 12.0);
    let percent = service.update_cdi_percent(&portfolio.id).await.unwrap();
    assert!((percent - 10.0 / 12.0 * 100.0).abs() < 1e-9);

    let stored = portfolio_service.get_portfolio(&portfolio.id).unwrap();
    assert!((stored.cdi_percent - percent).abs() < 1e-9);

    // A zero CDI cannot divide; the ratio is defined as zero
    let service = analytics(pool, 0.0);
    assert_eq!(service.update_cdi_percent(&portfolio.id).await.unwrap(), 0.0);
}

#[tokio::test]
async fn projections_from_positions_stay_ordered_across_scenarios() {
    let pool = common::setup_pool("projection_scenarios");
    let portfolio_service = PortfolioService::new(pool.clone());
    let investment_service = InvestmentService::new(pool.clone());

    let portfolio = portfolio_service
        .create_portfolio(NewPortfolio {
            id: None,
            name: "Carteira".to_string(),
        })
        .unwrap();

    // Equal weight: 1000 in stocks (1.2%/mo) and 1000 in fixed income
    // (0.9%/mo) blend to 1.05%/mo
    investment_service
        .apply(application(&portfolio.id, ASSET_TYPE_STOCK, "PETR4", 100.0, 10.0))
        .unwrap();
    investment_service
        .apply(application(
            &portfolio.id,
            ASSET_TYPE_FIXED_INCOME,
            "CDB123",
            1.0,
            1000.0,
        ))
        .unwrap();

    let service = analytics(pool, 12.0);
    let projections = service.project(&portfolio.id, 12, 100.0).unwrap();

    assert_eq!(projections.len(), 3);
    for projection in &projections {
        assert!((projection.monthly_return_percent - 1.05).abs() < 1e-9);
        assert_eq!(projection.points.len(), 13);
        assert_eq!(projection.points[0].value, 2000.0);
    }

    let finals: Vec<f64> = projections
        .iter()
        .map(|projection| projection.points.last().unwrap().value)
        .collect();
    assert!(finals[0] <= finals[1]);
    assert!(finals[1] <= finals[2]);
}
