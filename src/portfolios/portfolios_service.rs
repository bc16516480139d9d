use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use crate::db::{DbPool, DbTransactionExecutor};
use crate::history::HistoryRepository;
use crate::portfolios::{PortfolioError, Result};
use crate::schema::{investments, portfolio_history, portfolios};

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDB, PortfolioUpdate};
use super::portfolios_repository::PortfolioRepository;

/// Service for managing portfolios
pub struct PortfolioService {
    pool: Arc<DbPool>,
    repository: PortfolioRepository,
}

impl PortfolioService {
    /// Creates a new PortfolioService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        let repository = PortfolioRepository::new(pool.clone());
        Self { pool, repository }
    }

    /// Creates a new portfolio. The first portfolio ever created becomes
    /// primary and selected.
    pub fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;
        debug!("Creating portfolio '{}'", new_portfolio.name);

        self.pool
            .execute(|tx_conn| -> std::result::Result<Portfolio, PortfolioError> {
                let existing: i64 = portfolios::table.count().get_result(tx_conn)?;

                let mut portfolio_db: PortfolioDB = new_portfolio.into();
                if portfolio_db.id.is_empty() {
                    portfolio_db.id = uuid::Uuid::new_v4().to_string();
                }
                if existing == 0 {
                    portfolio_db.is_primary = true;
                    portfolio_db.is_selected = true;
                }

                diesel::insert_into(portfolios::table)
                    .values(&portfolio_db)
                    .execute(tx_conn)?;

                Ok(portfolio_db.into())
            })
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    /// Renames an existing portfolio
    pub fn update_portfolio(&self, portfolio_update: PortfolioUpdate) -> Result<Portfolio> {
        self.repository.update(portfolio_update)
    }

    /// Retrieves a portfolio by its ID
    pub fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_by_id(portfolio_id)
    }

    /// Lists all portfolios, primary first
    pub fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.repository.list()
    }

    /// Retrieves the primary portfolio, if one is set
    pub fn get_primary_portfolio(&self) -> Result<Option<Portfolio>> {
        self.repository.get_primary()
    }

    /// Marks a portfolio as primary, clearing the flag everywhere else
    pub fn set_primary(&self, portfolio_id: &str) -> Result<Portfolio> {
        let target_id = portfolio_id.to_string();
        let updated = self
            .pool
            .execute(move |tx_conn| -> std::result::Result<PortfolioDB, PortfolioError> {
                diesel::update(portfolios::table)
                    .set(portfolios::is_primary.eq(false))
                    .execute(tx_conn)?;

                let affected = diesel::update(portfolios::table.find(&target_id))
                    .set((
                        portfolios::is_primary.eq(true),
                        portfolios::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(tx_conn)?;
                if affected == 0 {
                    return Err(PortfolioError::NotFound(format!(
                        "Portfolio with id {} not found",
                        target_id
                    )));
                }

                Ok(portfolios::table.find(&target_id).first::<PortfolioDB>(tx_conn)?)
            })
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        Ok(updated.into())
    }

    /// Marks a portfolio as the selected one, clearing the flag everywhere else
    pub fn select_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        let target_id = portfolio_id.to_string();
        let updated = self
            .pool
            .execute(move |tx_conn| -> std::result::Result<PortfolioDB, PortfolioError> {
                diesel::update(portfolios::table)
                    .set(portfolios::is_selected.eq(false))
                    .execute(tx_conn)?;

                let affected = diesel::update(portfolios::table.find(&target_id))
                    .set((
                        portfolios::is_selected.eq(true),
                        portfolios::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(tx_conn)?;
                if affected == 0 {
                    return Err(PortfolioError::NotFound(format!(
                        "Portfolio with id {} not found",
                        target_id
                    )));
                }

                Ok(portfolios::table.find(&target_id).first::<PortfolioDB>(tx_conn)?)
            })
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        Ok(updated.into())
    }

    /// Recomputes total_value/total_gain from the portfolio's investments,
    /// persists them and records the day's history snapshot.
    pub fn refresh_totals(&self, portfolio_id: &str) -> Result<Portfolio> {
        let target_id = portfolio_id.to_string();
        let updated = self
            .pool
            .execute(move |tx_conn| -> std::result::Result<PortfolioDB, PortfolioError> {
                let positions: Vec<(f64, f64)> = investments::table
                    .filter(investments::portfolio_id.eq(&target_id))
                    .select((investments::current_value, investments::total_invested))
                    .load(tx_conn)?;

                let total_value: f64 = positions.iter().map(|(value, _)| value).sum();
                let total_gain: f64 = positions
                    .iter()
                    .map(|(value, invested)| value - invested)
                    .sum();

                let affected = diesel::update(portfolios::table.find(&target_id))
                    .set((
                        portfolios::total_value.eq(total_value),
                        portfolios::total_gain.eq(total_gain),
                        portfolios::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(tx_conn)?;
                if affected == 0 {
                    return Err(PortfolioError::NotFound(format!(
                        "Portfolio with id {} not found",
                        target_id
                    )));
                }

                let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
                diesel::insert_into(portfolio_history::table)
                    .values((
                        portfolio_history::id.eq(uuid::Uuid::new_v4().to_string()),
                        portfolio_history::portfolio_id.eq(&target_id),
                        portfolio_history::date.eq(&today),
                        portfolio_history::total_value.eq(total_value),
                        portfolio_history::total_gain.eq(total_gain),
                    ))
                    .on_conflict((portfolio_history::portfolio_id, portfolio_history::date))
                    .do_update()
                    .set((
                        portfolio_history::total_value.eq(total_value),
                        portfolio_history::total_gain.eq(total_gain),
                    ))
                    .execute(tx_conn)?;

                Ok(portfolios::table.find(&target_id).first::<PortfolioDB>(tx_conn)?)
            })
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        Ok(updated.into())
    }

    /// Persists the portfolio's performance relative to CDI
    pub fn set_cdi_percent(&self, portfolio_id: &str, percent: f64) -> Result<()> {
        let mut conn = crate::db::get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        diesel::update(portfolios::table.find(portfolio_id))
            .set((
                portfolios::cdi_percent.eq(percent),
                portfolios::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Deletes a portfolio together with its positions. Movements are kept
    /// as history; snapshots go with the portfolio.
    pub fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        let target_id = portfolio_id.to_string();
        debug!("Deleting portfolio {}", target_id);

        self.pool
            .execute(move |tx_conn| -> std::result::Result<(), PortfolioError> {
                diesel::delete(
                    investments::table.filter(investments::portfolio_id.eq(&target_id)),
                )
                .execute(tx_conn)?;

                diesel::delete(
                    portfolio_history::table
                        .filter(portfolio_history::portfolio_id.eq(&target_id)),
                )
                .execute(tx_conn)?;

                let affected = diesel::delete(portfolios::table.find(&target_id))
                    .execute(tx_conn)?;
                if affected == 0 {
                    return Err(PortfolioError::NotFound(format!(
                        "Portfolio with id {} not found",
                        target_id
                    )));
                }

                Ok(())
            })
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    /// History snapshots for the portfolio, oldest first
    pub fn get_history(&self, portfolio_id: &str) -> Result<Vec<crate::history::HistorySnapshot>> {
        let repo = HistoryRepository::new(self.pool.clone());
        repo.list_by_portfolio(portfolio_id)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }
}
