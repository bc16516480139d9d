use log::debug;
use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;
use crate::history::{HistoryRepository, HistoryService};
use crate::investments::{InvestmentRepository, InvestmentRepositoryTrait, QUOTED_ASSET_TYPES};
use crate::market_data::MarketDataService;
use crate::portfolios::PortfolioService;

use super::analytics_calculator;
use super::analytics_model::{CapitalGainsSummary, Projection, ProjectionScenario, RiskReturn};

/// Service computing the analysis-drawer numbers from stored positions
/// plus market data
pub struct AnalyticsService {
    investment_repository: Arc<dyn InvestmentRepositoryTrait>,
    history_repository: HistoryRepository,
    portfolio_service: PortfolioService,
    market_data: Arc<MarketDataService>,
}

impl AnalyticsService {
    /// Creates a new AnalyticsService instance
    pub fn new(pool: Arc<DbPool>, market_data: Arc<MarketDataService>) -> Self {
        Self {
            investment_repository: Arc::new(InvestmentRepository::new(pool.clone())),
            history_repository: HistoryRepository::new(pool.clone()),
            portfolio_service: PortfolioService::new(pool),
            market_data,
        }
    }

    /// Risk/return summary: period return from the snapshot series,
    /// value-weighted volatility from quotes, Sharpe against CDI.
    pub async fn risk_return(&self, portfolio_id: &str) -> Result<RiskReturn> {
        let positions = self.investment_repository.list_by_portfolio(portfolio_id)?;

        // Only quoted asset classes go to the market-data function
        let tickers: Vec<String> = positions
            .iter()
            .filter(|position| QUOTED_ASSET_TYPES.contains(&position.asset_type.as_str()))
            .filter_map(|position| position.ticker.clone())
            .collect();
        let quotes = self.market_data.get_quotes(&tickers).await?;

        let holdings: Vec<(f64, Option<f64>)> = positions
            .iter()
            .map(|position| {
                let volatility = position.ticker.as_ref().and_then(|ticker| {
                    quotes
                        .iter()
                        .find(|quote| &quote.ticker == ticker)
                        .and_then(|quote| quote.volatility)
                });
                (position.current_value, volatility)
            })
            .collect();

        let snapshots = self.history_repository.list_by_portfolio(portfolio_id)?;
        let period_return = HistoryService::period_return_percent(&snapshots);

        let rates = self.market_data.get_benchmark_rates().await?;
        let volatility = analytics_calculator::weighted_volatility(&holdings);
        let sharpe = analytics_calculator::sharpe_ratio(period_return, rates.cdi, volatility);

        debug!(
            "Risk/return for {}: return {:.2}%, vol {:.2}, sharpe {:.2}",
            portfolio_id, period_return, volatility, sharpe
        );

        Ok(RiskReturn {
            period_return_percent: period_return,
            weighted_volatility: volatility,
            sharpe_ratio: sharpe,
            risk_free_rate: rates.cdi,
        })
    }

    /// Scenario projections for the portfolio over `months`, optionally
    /// with a fixed monthly contribution
    pub fn project(
        &self,
        portfolio_id: &str,
        months: u32,
        monthly_contribution: f64,
    ) -> Result<Vec<Projection>> {
        let positions = self.investment_repository.list_by_portfolio(portfolio_id)?;
        let initial_value: f64 = positions.iter().map(|p| p.current_value).sum();
        let monthly_return = analytics_calculator::portfolio_monthly_return(&positions);

        Ok(ProjectionScenario::all()
            .into_iter()
            .map(|scenario| {
                analytics_calculator::project(
                    scenario,
                    initial_value,
                    monthly_contribution,
                    monthly_return,
                    months,
                )
            })
            .collect())
    }

    /// Capital gains summary for the portfolio
    pub fn capital_gains(&self, portfolio_id: &str) -> Result<CapitalGainsSummary> {
        let positions = self.investment_repository.list_by_portfolio(portfolio_id)?;
        Ok(analytics_calculator::capital_gains(&positions))
    }

    /// Recomputes and persists the portfolio's performance relative to
    /// CDI over the snapshot period
    pub async fn update_cdi_percent(&self, portfolio_id: &str) -> Result<f64> {
        let snapshots = self.history_repository.list_by_portfolio(portfolio_id)?;
        let period_return = HistoryService::period_return_percent(&snapshots);

        let rates = self.market_data.get_benchmark_rates().await?;
        let percent_of_cdi = if rates.cdi == 0.0 {
            0.0
        } else {
            period_return / rates.cdi * 100.0
        };

        self.portfolio_service
            .set_cdi_percent(portfolio_id, percent_of_cdi)?;

        Ok(percent_of_cdi)
    }
}
