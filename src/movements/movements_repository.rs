use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::movements::{MovementError, Result};
use crate::schema::movements;

use super::movements_model::{Movement, MovementDB, NewMovement};

/// Repository for the movements ledger. The ledger is append-only:
/// this repository exposes inserts and reads, nothing else.
pub struct MovementRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl MovementRepository {
    /// Creates a new MovementRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| MovementError::DatabaseError(e.to_string()))
    }

    /// Appends a movement to the ledger
    pub fn create(&self, new_movement: NewMovement) -> Result<Movement> {
        new_movement.validate()?;

        let mut movement_db: MovementDB = new_movement.into();
        movement_db.id = uuid::Uuid::new_v4().to_string();

        let mut conn = self.conn()?;

        diesel::insert_into(movements::table)
            .values(&movement_db)
            .execute(&mut conn)
            .map_err(|e| MovementError::DatabaseError(e.to_string()))?;

        Ok(movement_db.into())
    }

    /// Appends several movements in one statement
    pub fn create_many(&self, new_movements: Vec<NewMovement>) -> Result<usize> {
        for movement in &new_movements {
            movement.validate()?;
        }

        let rows: Vec<MovementDB> = new_movements
            .into_iter()
            .map(|movement| {
                let mut db: MovementDB = movement.into();
                db.id = uuid::Uuid::new_v4().to_string();
                db
            })
            .collect();

        let mut conn = self.conn()?;

        diesel::insert_into(movements::table)
            .values(&rows)
            .execute(&mut conn)
            .map_err(|e| MovementError::DatabaseError(e.to_string()))
    }

    /// Lists movements, newest first, optionally filtered by portfolio,
    /// type and date range
    pub fn list(
        &self,
        portfolio_id_filter: Option<&str>,
        movement_type_filter: Option<&str>,
        start_date: Option<NaiveDateTime>,
        end_date: Option<NaiveDateTime>,
    ) -> Result<Vec<Movement>> {
        let mut conn = self.conn()?;

        let mut query = movements::table.into_boxed();

        if let Some(pid) = portfolio_id_filter {
            query = query.filter(movements::portfolio_id.eq(pid.to_string()));
        }
        if let Some(mtype) = movement_type_filter {
            query = query.filter(movements::movement_type.eq(mtype.to_string()));
        }
        if let Some(start) = start_date {
            query = query.filter(movements::movement_date.ge(start));
        }
        if let Some(end) = end_date {
            query = query.filter(movements::movement_date.le(end));
        }

        query
            .order(movements::movement_date.desc())
            .load::<MovementDB>(&mut conn)
            .map_err(|e| MovementError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Movement::from).collect())
    }

    /// Lists every movement for a portfolio, newest first
    pub fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Movement>> {
        self.list(Some(portfolio_id), None, None, None)
    }
}
