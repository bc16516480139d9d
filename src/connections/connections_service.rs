use chrono::Utc;
use diesel::prelude::*;
use futures::future::join_all;
use log::{debug, error, info};
use std::sync::Arc;

use crate::connections::{ConnectionError, Result};
use crate::db::{DbPool, DbTransactionExecutor};
use crate::investments::{position_math, InvestmentDB, SOURCE_PLUGGY};
use crate::schema::investments;
use uuid::Uuid;

use super::connections_model::{
    ConnectionStatus, NewPluggyConnection, PluggyConnection, PluggyPosition, SyncReport,
};
use super::connections_repository::ConnectionRepository;
use super::providers::PluggyProvider;

/// Service for linking, syncing and disconnecting Pluggy items
pub struct ConnectionService {
    pool: Arc<DbPool>,
    repository: ConnectionRepository,
    provider: Arc<dyn PluggyProvider>,
}

impl ConnectionService {
    /// Creates a new ConnectionService instance
    pub fn new(pool: Arc<DbPool>, provider: Arc<dyn PluggyProvider>) -> Self {
        let repository = ConnectionRepository::new(pool.clone());
        Self {
            pool,
            repository,
            provider,
        }
    }

    /// Stores (or refreshes) a connection after the user links an
    /// institution through the connect widget
    pub fn link(&self, new_connection: NewPluggyConnection) -> Result<PluggyConnection> {
        info!("Linking institution '{}'", new_connection.connector_name);
        self.repository.upsert(new_connection)
    }

    /// Lists all stored connections
    pub fn get_connections(&self) -> Result<Vec<PluggyConnection>> {
        self.repository.list()
    }

    /// Removes a connection. The aggregator item is deleted first; an
    /// item the aggregator no longer knows is treated as already gone.
    /// When the last connection goes away the imported positions are
    /// removed with it.
    pub async fn disconnect(&self, item_id: &str, portfolio_id: &str) -> Result<()> {
        debug!("Disconnecting item {}", item_id);

        match self.provider.delete_item(item_id).await {
            Ok(()) => {}
            Err(ConnectionError::ItemNotFound(_)) => {
                info!("Item {} already gone on the aggregator side", item_id);
            }
            Err(e) => return Err(e),
        }

        self.repository.delete_by_item_id(item_id)?;

        if self.repository.list()?.is_empty() {
            let target_id = portfolio_id.to_string();
            self.pool
                .execute(move |tx_conn| -> std::result::Result<(), ConnectionError> {
                    diesel::delete(
                        investments::table
                            .filter(investments::portfolio_id.eq(&target_id))
                            .filter(investments::source.eq(SOURCE_PLUGGY)),
                    )
                    .execute(tx_conn)?;
                    Ok(())
                })
                .map_err(|e| ConnectionError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }

    /// Fetches positions for every stored connection in parallel and
    /// replaces the portfolio's imported positions with the result.
    /// Items the aggregator reports as gone are deleted locally and
    /// listed in the report instead of failing the sync.
    pub async fn sync_all(&self, portfolio_id: &str) -> Result<SyncReport> {
        let connections = self.repository.list()?;
        if connections.is_empty() {
            return Ok(SyncReport::default());
        }

        let fetches = connections.iter().map(|connection| {
            let item_id = connection.item_id.clone();
            async move {
                let result = self.provider.fetch_positions(&item_id).await;
                (item_id, result)
            }
        });
        let results = join_all(fetches).await;

        let mut report = SyncReport::default();
        let mut imported: Vec<PluggyPosition> = Vec::new();

        for (item_id, result) in results {
            match result {
                Ok(positions) => {
                    report.synced_items.push(item_id.clone());
                    imported.extend(positions);
                    self.repository
                        .update_status(&item_id, ConnectionStatus::Connected.as_str())?;
                }
                Err(ConnectionError::ItemNotFound(_)) => {
                    info!("Removing orphaned connection {}", item_id);
                    self.repository.delete_by_item_id(&item_id)?;
                    report.removed_orphans.push(item_id);
                }
                Err(e) => {
                    error!("Sync failed for item {}: {}", item_id, e);
                    self.repository
                        .update_status(&item_id, ConnectionStatus::Error.as_str())?;
                    report.failed_items.push(item_id);
                }
            }
        }

        // A failed fetch means the imported set is incomplete; replacing
        // now would erase the failed item's stored positions.
        if report.failed_items.is_empty() {
            report.imported_positions = imported.len();
            self.replace_imported_positions(portfolio_id, imported)?;
        }

        Ok(report)
    }

    /// Swaps the portfolio's PLUGGY-sourced positions for the freshly
    /// fetched set, in one transaction
    fn replace_imported_positions(
        &self,
        portfolio_id: &str,
        positions: Vec<PluggyPosition>,
    ) -> Result<()> {
        let target_id = portfolio_id.to_string();

        self.pool
            .execute(move |tx_conn| -> std::result::Result<(), ConnectionError> {
                diesel::delete(
                    investments::table
                        .filter(investments::portfolio_id.eq(&target_id))
                        .filter(investments::source.eq(SOURCE_PLUGGY)),
                )
                .execute(tx_conn)?;

                let now = Utc::now().naive_utc();
                let rows: Vec<InvestmentDB> = positions
                    .into_iter()
                    .map(|position| {
                        let total_invested = position.quantity * position.unit_price;
                        let current_value = position.quantity * position.current_price;
                        InvestmentDB {
                            id: Uuid::new_v4().to_string(),
                            portfolio_id: target_id.clone(),
                            asset_name: position.asset_name,
                            asset_type: position.asset_type,
                            ticker: position.ticker,
                            quantity: position.quantity,
                            purchase_price: position.unit_price,
                            current_price: position.current_price,
                            total_invested,
                            current_value,
                            gain_percent: position_math::gain_percent(
                                total_invested,
                                current_value,
                            ),
                            source: SOURCE_PLUGGY.to_string(),
                            maturity_date: position.maturity_date,
                            created_at: now,
                            updated_at: now,
                        }
                    })
                    .collect();

                if !rows.is_empty() {
                    diesel::insert_into(investments::table)
                        .values(&rows)
                        .execute(tx_conn)?;
                }

                Ok(())
            })
            .map_err(|e| ConnectionError::DatabaseError(e.to_string()))
    }
}
