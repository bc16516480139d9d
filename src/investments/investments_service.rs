use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use crate::db::{DbConnection, DbPool, DbTransactionExecutor};
use crate::investments::position_math;
use crate::investments::{InvestmentError, Result};
use crate::movements::movements_constants::{
    MOVEMENT_TYPE_APPLICATION, MOVEMENT_TYPE_REDEMPTION, MOVEMENT_TYPE_TRANSFER_IN,
    MOVEMENT_TYPE_TRANSFER_OUT,
};
use crate::movements::MovementDB;
use crate::schema::{investments, movements, portfolios};
use uuid::Uuid;

use super::investments_model::*;
use super::investments_repository::InvestmentRepository;
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};

/// Service for managing investment positions
pub struct InvestmentService {
    pool: Arc<DbPool>,
    repository: Arc<dyn InvestmentRepositoryTrait>,
}

impl InvestmentService {
    /// Creates a new InvestmentService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        let repository = Arc::new(InvestmentRepository::new(pool.clone()));
        Self { pool, repository }
    }

    fn find_position_db(
        conn: &mut DbConnection,
        portfolio_id: &str,
        ticker: Option<&str>,
        asset_name: &str,
    ) -> std::result::Result<Option<InvestmentDB>, diesel::result::Error> {
        let mut query = investments::table
            .filter(investments::portfolio_id.eq(portfolio_id))
            .into_boxed();

        query = match ticker {
            Some(t) => query.filter(investments::ticker.eq(t.to_string())),
            None => query
                .filter(investments::ticker.is_null())
                .filter(investments::asset_name.eq(asset_name.to_string())),
        };

        query.first::<InvestmentDB>(conn).optional()
    }

    fn portfolio_name(
        conn: &mut DbConnection,
        portfolio_id: &str,
    ) -> std::result::Result<String, InvestmentError> {
        portfolios::table
            .find(portfolio_id)
            .select(portfolios::name)
            .first::<String>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => InvestmentError::NotFound(format!(
                    "Portfolio with id {} not found",
                    portfolio_id
                )),
                _ => InvestmentError::DatabaseError(e.to_string()),
            })
    }

    fn insert_movement(
        conn: &mut DbConnection,
        movement: &MovementDB,
    ) -> std::result::Result<(), diesel::result::Error> {
        diesel::insert_into(movements::table)
            .values(movement)
            .execute(conn)?;
        Ok(())
    }

    fn movement_row(
        portfolio_id: &str,
        movement_type: &str,
        asset_name: &str,
        ticker: Option<&str>,
        quantity: f64,
        unit_price: f64,
    ) -> MovementDB {
        let now = Utc::now().naive_utc();
        MovementDB {
            id: Uuid::new_v4().to_string(),
            portfolio_id: portfolio_id.to_string(),
            movement_type: movement_type.to_string(),
            asset_name: asset_name.to_string(),
            ticker: ticker.map(|t| t.to_string()),
            quantity,
            unit_price,
            total_value: quantity * unit_price,
            from_portfolio_name: None,
            to_portfolio_name: None,
            movement_date: now,
            created_at: now,
        }
    }
}

impl InvestmentServiceTrait for InvestmentService {
    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.repository.get_by_id(investment_id)
    }

    fn get_investments(&self, portfolio_id: &str) -> Result<Vec<Investment>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Applies quantity at unit price into a portfolio, merging into an
    /// existing position with a weighted-average purchase price, and
    /// appends the APPLICATION ledger row. One transaction.
    fn apply(&self, application: NewApplication) -> Result<Investment> {
        application.validate()?;

        // Surface a missing portfolio before entering the transaction
        {
            let mut conn = crate::db::get_connection(&self.pool)
                .map_err(|e| InvestmentError::DatabaseError(e.to_string()))?;
            Self::portfolio_name(&mut conn, &application.portfolio_id)?;
        }
        debug!(
            "Applying {} x {} into portfolio {}",
            application.quantity,
            application.asset_name,
            application.portfolio_id
        );

        self.pool
            .execute(move |tx_conn| -> std::result::Result<Investment, InvestmentError> {
                let existing = Self::find_position_db(
                    tx_conn,
                    &application.portfolio_id,
                    application.ticker.as_deref(),
                    &application.asset_name,
                )?;

                let movement = Self::movement_row(
                    &application.portfolio_id,
                    MOVEMENT_TYPE_APPLICATION,
                    &application.asset_name,
                    application.ticker.as_deref(),
                    application.quantity,
                    application.unit_price,
                );

                let result = match existing {
                    Some(mut position) => {
                        let merged = position_math::merge_application(
                            position.quantity,
                            position.total_invested,
                            application.quantity,
                            application.unit_price,
                        );

                        position.quantity = merged.quantity;
                        position.total_invested = merged.total_invested;
                        position.purchase_price = merged.purchase_price;
                        position.current_value = merged.quantity * position.current_price;
                        position.gain_percent = position_math::gain_percent(
                            position.total_invested,
                            position.current_value,
                        );
                        position.updated_at = Utc::now().naive_utc();

                        diesel::update(investments::table.find(&position.id))
                            .set(&position)
                            .execute(tx_conn)?;

                        position.into()
                    }
                    None => {
                        let mut position: InvestmentDB = application.into();
                        position.id = Uuid::new_v4().to_string();

                        diesel::insert_into(investments::table)
                            .values(&position)
                            .execute(tx_conn)?;

                        position.into()
                    }
                };

                Self::insert_movement(tx_conn, &movement)?;

                Ok(result)
            })
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }

    /// Redeems quantity from a position. A partial redemption reduces
    /// quantity, cost basis and value proportionally; a redemption that
    /// empties the position deletes the row. Appends the REDEMPTION
    /// ledger row. One transaction.
    fn redeem(&self, redemption: NewRedemption) -> Result<RedemptionOutcome> {
        redemption.validate()?;

        // Surface quantity errors before entering the transaction
        let position = self.repository.get_by_id(&redemption.investment_id)?;
        if redemption.quantity > position.quantity {
            return Err(InvestmentError::InsufficientQuantity(format!(
                "Cannot redeem {} from a position holding {}",
                redemption.quantity, position.quantity
            )));
        }
        debug!(
            "Redeeming {} x {} from portfolio {}",
            redemption.quantity, position.asset_name, position.portfolio_id
        );

        self.pool
            .execute(
                move |tx_conn| -> std::result::Result<RedemptionOutcome, InvestmentError> {
                    let mut db_position = investments::table
                        .find(&redemption.investment_id)
                        .first::<InvestmentDB>(tx_conn)?;

                    let reduced = position_math::reduce_position(
                        db_position.quantity,
                        db_position.total_invested,
                        db_position.current_value,
                        redemption.quantity,
                    );

                    let movement = Self::movement_row(
                        &db_position.portfolio_id,
                        MOVEMENT_TYPE_REDEMPTION,
                        &db_position.asset_name,
                        db_position.ticker.as_deref(),
                        redemption.quantity,
                        db_position.current_price,
                    );

                    let outcome = if reduced.is_closed() {
                        diesel::delete(investments::table.find(&db_position.id))
                            .execute(tx_conn)?;
                        RedemptionOutcome::Closed {
                            investment_id: db_position.id.clone(),
                        }
                    } else {
                        db_position.quantity = reduced.quantity;
                        db_position.total_invested = reduced.total_invested;
                        db_position.current_value = reduced.current_value;
                        db_position.gain_percent = position_math::gain_percent(
                            db_position.total_invested,
                            db_position.current_value,
                        );
                        db_position.updated_at = Utc::now().naive_utc();

                        diesel::update(investments::table.find(&db_position.id))
                            .set(&db_position)
                            .execute(tx_conn)?;

                        RedemptionOutcome::Partial(db_position.clone().into())
                    };

                    Self::insert_movement(tx_conn, &movement)?;

                    Ok(outcome)
                },
            )
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }

    /// Moves quantity of a position to another portfolio, preserving
    /// cost basis. Writes the source reduction, the destination merge
    /// and both TRANSFER ledger rows in one transaction.
    fn transfer(&self, transfer: NewTransfer) -> Result<Investment> {
        transfer.validate()?;

        let source = self.repository.get_by_id(&transfer.investment_id)?;
        if transfer.to_portfolio_id == source.portfolio_id {
            return Err(InvestmentError::InvalidData(
                "Cannot transfer a position to its own portfolio".to_string(),
            ));
        }
        if transfer.quantity > source.quantity {
            return Err(InvestmentError::InsufficientQuantity(format!(
                "Cannot transfer {} from a position holding {}",
                transfer.quantity, source.quantity
            )));
        }
        {
            let mut conn = crate::db::get_connection(&self.pool)
                .map_err(|e| InvestmentError::DatabaseError(e.to_string()))?;
            Self::portfolio_name(&mut conn, &transfer.to_portfolio_id)?;
        }
        debug!(
            "Transferring {} x {} from portfolio {} to {}",
            transfer.quantity, source.asset_name, source.portfolio_id, transfer.to_portfolio_id
        );

        self.pool
            .execute(move |tx_conn| -> std::result::Result<Investment, InvestmentError> {
                let from_name = Self::portfolio_name(tx_conn, &source.portfolio_id)?;
                let to_name = Self::portfolio_name(tx_conn, &transfer.to_portfolio_id)?;

                let mut source_db = investments::table
                    .find(&transfer.investment_id)
                    .first::<InvestmentDB>(tx_conn)?;

                let reduced = position_math::reduce_position(
                    source_db.quantity,
                    source_db.total_invested,
                    source_db.current_value,
                    transfer.quantity,
                );

                // Cost basis leaves the source proportionally
                let transferred_invested = source_db.total_invested - reduced.total_invested;
                let transferred_price = transferred_invested / transfer.quantity;

                if reduced.is_closed() {
                    diesel::delete(investments::table.find(&source_db.id)).execute(tx_conn)?;
                } else {
                    source_db.quantity = reduced.quantity;
                    source_db.total_invested = reduced.total_invested;
                    source_db.current_value = reduced.current_value;
                    source_db.gain_percent = position_math::gain_percent(
                        source_db.total_invested,
                        source_db.current_value,
                    );
                    source_db.updated_at = Utc::now().naive_utc();

                    diesel::update(investments::table.find(&source_db.id))
                        .set(&source_db)
                        .execute(tx_conn)?;
                }

                // Merge into the destination, keeping the transferred basis
                let destination = Self::find_position_db(
                    tx_conn,
                    &transfer.to_portfolio_id,
                    source_db.ticker.as_deref(),
                    &source_db.asset_name,
                )?;

                let result: Investment = match destination {
                    Some(mut position) => {
                        let merged = position_math::merge_application(
                            position.quantity,
                            position.total_invested,
                            transfer.quantity,
                            transferred_price,
                        );

                        position.quantity = merged.quantity;
                        position.total_invested = merged.total_invested;
                        position.purchase_price = merged.purchase_price;
                        position.current_value = merged.quantity * position.current_price;
                        position.gain_percent = position_math::gain_percent(
                            position.total_invested,
                            position.current_value,
                        );
                        position.updated_at = Utc::now().naive_utc();

                        diesel::update(investments::table.find(&position.id))
                            .set(&position)
                            .execute(tx_conn)?;

                        position.into()
                    }
                    None => {
                        let now = Utc::now().naive_utc();
                        let position = InvestmentDB {
                            id: Uuid::new_v4().to_string(),
                            portfolio_id: transfer.to_portfolio_id.clone(),
                            asset_name: source_db.asset_name.clone(),
                            asset_type: source_db.asset_type.clone(),
                            ticker: source_db.ticker.clone(),
                            quantity: transfer.quantity,
                            purchase_price: transferred_price,
                            current_price: source_db.current_price,
                            total_invested: transferred_invested,
                            current_value: transfer.quantity * source_db.current_price,
                            gain_percent: position_math::gain_percent(
                                transferred_invested,
                                transfer.quantity * source_db.current_price,
                            ),
                            source: source_db.source.clone(),
                            maturity_date: source_db.maturity_date.clone(),
                            created_at: now,
                            updated_at: now,
                        };

                        diesel::insert_into(investments::table)
                            .values(&position)
                            .execute(tx_conn)?;

                        position.into()
                    }
                };

                let mut out_movement = Self::movement_row(
                    &source_db.portfolio_id,
                    MOVEMENT_TYPE_TRANSFER_OUT,
                    &source_db.asset_name,
                    source_db.ticker.as_deref(),
                    transfer.quantity,
                    transferred_price,
                );
                out_movement.from_portfolio_name = Some(from_name.clone());
                out_movement.to_portfolio_name = Some(to_name.clone());
                Self::insert_movement(tx_conn, &out_movement)?;

                let mut in_movement = Self::movement_row(
                    &transfer.to_portfolio_id,
                    MOVEMENT_TYPE_TRANSFER_IN,
                    &source_db.asset_name,
                    source_db.ticker.as_deref(),
                    transfer.quantity,
                    transferred_price,
                );
                in_movement.from_portfolio_name = Some(from_name);
                in_movement.to_portfolio_name = Some(to_name);
                Self::insert_movement(tx_conn, &in_movement)?;

                Ok(result)
            })
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }

    /// Refreshes current prices from the latest quotes, recomputing
    /// value and gain for each matching position
    fn update_prices(&self, quotes: &[(String, f64)]) -> Result<usize> {
        let quotes = quotes.to_vec();

        self.pool
            .execute(move |tx_conn| -> std::result::Result<usize, InvestmentError> {
                let mut updated = 0usize;

                for (ticker, price) in &quotes {
                    let positions: Vec<InvestmentDB> = investments::table
                        .filter(investments::ticker.eq(ticker))
                        .load(tx_conn)?;

                    for mut position in positions {
                        position.current_price = *price;
                        position.current_value = position.quantity * price;
                        position.gain_percent = position_math::gain_percent(
                            position.total_invested,
                            position.current_value,
                        );
                        position.updated_at = Utc::now().naive_utc();

                        diesel::update(investments::table.find(&position.id))
                            .set(&position)
                            .execute(tx_conn)?;
                        updated += 1;
                    }
                }

                Ok(updated)
            })
            .map_err(|e| InvestmentError::DatabaseError(e.to_string()))
    }

    fn delete_investment(&self, investment_id: &str) -> Result<()> {
        self.repository.delete(investment_id)?;
        Ok(())
    }

    /// Removes every position in the portfolio (bulk delete)
    fn delete_all(&self, portfolio_id: &str) -> Result<usize> {
        self.repository.delete_by_portfolio(portfolio_id)
    }
}
