use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::portfolio_history;

use super::history_model::HistorySnapshot;

/// Read side of the portfolio_history table. Snapshots are written by
/// `PortfolioService::refresh_totals`.
pub struct HistoryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl HistoryRepository {
    /// Creates a new HistoryRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// All snapshots for a portfolio, oldest first
    pub fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<HistorySnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        Ok(portfolio_history::table
            .filter(portfolio_history::portfolio_id.eq(portfolio_id))
            .order(portfolio_history::date.asc())
            .load::<HistorySnapshot>(&mut conn)?)
    }

    /// Snapshots inside a date range (inclusive), oldest first
    pub fn list_range(
        &self,
        portfolio_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<HistorySnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        Ok(portfolio_history::table
            .filter(portfolio_history::portfolio_id.eq(portfolio_id))
            .filter(portfolio_history::date.ge(start_date))
            .filter(portfolio_history::date.le(end_date))
            .order(portfolio_history::date.asc())
            .load::<HistorySnapshot>(&mut conn)?)
    }

    /// Most recent snapshot for a portfolio, if any
    pub fn get_latest(&self, portfolio_id: &str) -> Result<Option<HistorySnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        Ok(portfolio_history::table
            .filter(portfolio_history::portfolio_id.eq(portfolio_id))
            .order(portfolio_history::date.desc())
            .first::<HistorySnapshot>(&mut conn)
            .optional()?)
    }
}
