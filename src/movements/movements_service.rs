use std::sync::Arc;

use crate::db::DbPool;
use crate::movements::Result;

use super::movements_model::{Movement, NewMovement};
use super::movements_repository::MovementRepository;

/// Service for reading and recording ledger movements
pub struct MovementService {
    repository: MovementRepository,
}

impl MovementService {
    /// Creates a new MovementService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            repository: MovementRepository::new(pool),
        }
    }

    /// Records a movement in the ledger
    pub fn record(&self, new_movement: NewMovement) -> Result<Movement> {
        self.repository.create(new_movement)
    }

    /// Records several movements at once
    pub fn record_many(&self, new_movements: Vec<NewMovement>) -> Result<usize> {
        self.repository.create_many(new_movements)
    }

    /// All movements, newest first
    pub fn get_movements(&self) -> Result<Vec<Movement>> {
        self.repository.list(None, None, None, None)
    }

    /// Movements for one portfolio, newest first
    pub fn get_movements_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Movement>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Movements of one type within an optional date range
    pub fn search(
        &self,
        portfolio_id: Option<&str>,
        movement_type: Option<&str>,
        start_date: Option<chrono::NaiveDateTime>,
        end_date: Option<chrono::NaiveDateTime>,
    ) -> Result<Vec<Movement>> {
        self.repository
            .list(portfolio_id, movement_type, start_date, end_date)
    }
}
