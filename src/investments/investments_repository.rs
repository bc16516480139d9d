use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::investments::{InvestmentError, Result};
use crate::schema::investments;

use super::investments_model::{Investment, InvestmentDB};
use super::investments_traits::InvestmentRepositoryTrait;

/// Repository for managing investment positions in the database
pub struct InvestmentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl InvestmentRepository {
    /// Creates a new InvestmentRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }
}

impl InvestmentRepositoryTrait for InvestmentRepository {
    fn get_by_id(&self, investment_id: &str) -> Result<Investment> {
        let mut conn = self.conn()?;

        let investment = investments::table
            .find(investment_id)
            .first::<InvestmentDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => InvestmentError::NotFound(format!(
                    "Investment with id {} not found",
                    investment_id
                )),
                _ => InvestmentError::DatabaseError(e.to_string()),
            })?;

        Ok(investment.into())
    }

    fn list(&self) -> Result<Vec<Investment>> {
        let mut conn = self.conn()?;

        investments::table
            .order(investments::asset_name.asc())
            .load::<InvestmentDB>(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Investment::from).collect())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Investment>> {
        let mut conn = self.conn()?;

        investments::table
            .filter(investments::portfolio_id.eq(portfolio_id))
            .order(investments::asset_name.asc())
            .load::<InvestmentDB>(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Investment::from).collect())
    }

    fn list_by_source(&self, portfolio_id: &str, source: &str) -> Result<Vec<Investment>> {
        let mut conn = self.conn()?;

        investments::table
            .filter(investments::portfolio_id.eq(portfolio_id))
            .filter(investments::source.eq(source))
            .order(investments::asset_name.asc())
            .load::<InvestmentDB>(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Investment::from).collect())
    }

    fn find_position(
        &self,
        portfolio_id: &str,
        ticker: Option<&str>,
        asset_name: &str,
    ) -> Result<Option<Investment>> {
        let mut conn = self.conn()?;

        let mut query = investments::table
            .filter(investments::portfolio_id.eq(portfolio_id))
            .into_boxed();

        // Match on ticker when the asset has one, on name otherwise
        query = match ticker {
            Some(t) => query.filter(investments::ticker.eq(t.to_string())),
            None => query
                .filter(investments::ticker.is_null())
                .filter(investments::asset_name.eq(asset_name.to_string())),
        };

        query
            .first::<InvestmentDB>(&mut conn)
            .optional()
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
            .map(|result| result.map(Investment::from))
    }

    fn insert(&self, investment_db: &InvestmentDB) -> Result<Investment> {
        let mut conn = self.conn()?;

        diesel::insert_into(investments::table)
            .values(investment_db)
            .execute(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))?;

        Ok(investment_db.clone().into())
    }

    fn update(&self, investment_db: &InvestmentDB) -> Result<Investment> {
        let mut conn = self.conn()?;

        let affected = diesel::update(investments::table.find(&investment_db.id))
            .set(investment_db)
            .execute(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(InvestmentError::NotFound(format!(
                "Investment with id {} not found",
                investment_db.id
            )));
        }

        Ok(investment_db.clone().into())
    }

    fn delete(&self, investment_id: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        let affected = diesel::delete(investments::table.find(investment_id))
            .execute(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(InvestmentError::NotFound(format!(
                "Investment with id {} not found",
                investment_id
            )));
        }

        Ok(affected)
    }

    fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        diesel::delete(investments::table.filter(investments::portfolio_id.eq(portfolio_id)))
            .execute(&mut conn)
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }

    fn delete_by_source(&self, portfolio_id: &str, source: &str) -> Result<usize> {
        let mut conn = self.conn()?;

        diesel::delete(
            investments::table
                .filter(investments::portfolio_id.eq(portfolio_id))
                .filter(investments::source.eq(source)),
        )
        .execute(&mut conn)
        .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }
}
