use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::portfolios::{PortfolioError, Result};
use crate::schema::portfolios;
use crate::schema::portfolios::dsl::*;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioDB, PortfolioUpdate};

/// Repository for managing portfolio data in the database
pub struct PortfolioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl PortfolioRepository {
    /// Creates a new PortfolioRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a new portfolio in the database
    pub fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;

        let mut portfolio_db: PortfolioDB = new_portfolio.into();
        portfolio_db.id = uuid::Uuid::new_v4().to_string();

        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        diesel::insert_into(portfolios::table)
            .values(&portfolio_db)
            .execute(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        Ok(portfolio_db.into())
    }

    /// Renames an existing portfolio, preserving totals and flags
    pub fn update(&self, portfolio_update: PortfolioUpdate) -> Result<Portfolio> {
        portfolio_update.validate()?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        let mut portfolio_db = portfolios
            .find(&portfolio_update.id)
            .first::<PortfolioDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => PortfolioError::NotFound(format!(
                    "Portfolio with id {} not found",
                    portfolio_update.id
                )),
                _ => PortfolioError::DatabaseError(e.to_string()),
            })?;

        portfolio_db.name = portfolio_update.name;
        portfolio_db.updated_at = chrono::Utc::now().naive_utc();

        diesel::update(portfolios.find(&portfolio_db.id))
            .set(&portfolio_db)
            .execute(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        Ok(portfolio_db.into())
    }

    /// Retrieves a portfolio by its ID
    pub fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        let portfolio = portfolios
            .find(portfolio_id)
            .first::<PortfolioDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => PortfolioError::NotFound(format!(
                    "Portfolio with id {} not found",
                    portfolio_id
                )),
                _ => PortfolioError::DatabaseError(e.to_string()),
            })?;

        Ok(portfolio.into())
    }

    /// Lists portfolios, primary first, then by name
    pub fn list(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        portfolios::table
            .order((is_primary.desc(), name.asc()))
            .load::<PortfolioDB>(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Portfolio::from).collect())
    }

    /// Retrieves the primary portfolio, if one is set
    pub fn get_primary(&self) -> Result<Option<Portfolio>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        portfolios::table
            .filter(is_primary.eq(true))
            .first::<PortfolioDB>(&mut conn)
            .optional()
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
            .map(|result| result.map(Portfolio::from))
    }

    /// Counts portfolios in the database
    pub fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        portfolios::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))
    }

    /// Deletes a portfolio by its ID and returns the number of deleted records
    pub fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        let affected = diesel::delete(portfolios.find(portfolio_id))
            .execute(&mut conn)
            .map_err(|e| PortfolioError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(PortfolioError::NotFound(format!(
                "Portfolio with id {} not found",
                portfolio_id
            )));
        }

        Ok(affected)
    }
}
