use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::connections_errors::{ConnectionError, Result};

/// Connection status labels
pub const CONNECTION_STATUS_CONNECTED: &str = "CONNECTED";
pub const CONNECTION_STATUS_UPDATING: &str = "UPDATING";
pub const CONNECTION_STATUS_ERROR: &str = "ERROR";

/// Domain model for a linked Open-Finance institution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluggyConnection {
    pub id: String,
    pub item_id: String,
    pub connector_name: String,
    pub connector_logo: Option<String>,
    pub connector_color: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for pluggy connections
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::pluggy_connections)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PluggyConnectionDB {
    pub id: String,
    pub item_id: String,
    pub connector_name: String,
    pub connector_logo: Option<String>,
    pub connector_color: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for linking an institution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPluggyConnection {
    pub item_id: String,
    pub connector_name: String,
    pub connector_logo: Option<String>,
    pub connector_color: Option<String>,
}

impl NewPluggyConnection {
    /// Validates the new connection data
    pub fn validate(&self) -> Result<()> {
        if self.item_id.trim().is_empty() {
            return Err(ConnectionError::InvalidData(
                "Item ID cannot be empty".to_string(),
            ));
        }
        if self.connector_name.trim().is_empty() {
            return Err(ConnectionError::InvalidData(
                "Connector name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Enum representing the connection lifecycle states
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Connected,
    Updating,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => CONNECTION_STATUS_CONNECTED,
            ConnectionStatus::Updating => CONNECTION_STATUS_UPDATING,
            ConnectionStatus::Error => CONNECTION_STATUS_ERROR,
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == CONNECTION_STATUS_CONNECTED => Ok(ConnectionStatus::Connected),
            s if s == CONNECTION_STATUS_UPDATING => Ok(ConnectionStatus::Updating),
            s if s == CONNECTION_STATUS_ERROR => Ok(ConnectionStatus::Error),
            _ => Err(format!("Unknown connection status: {}", s)),
        }
    }
}

/// A position as reported by the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluggyPosition {
    pub asset_name: String,
    pub asset_type: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub current_price: f64,
    pub maturity_date: Option<String>,
}

/// Result of syncing all stored connections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub synced_items: Vec<String>,
    pub imported_positions: usize,
    pub removed_orphans: Vec<String>,
    pub failed_items: Vec<String>,
}

// Conversion implementations
impl From<PluggyConnectionDB> for PluggyConnection {
    fn from(db: PluggyConnectionDB) -> Self {
        Self {
            id: db.id,
            item_id: db.item_id,
            connector_name: db.connector_name,
            connector_logo: db.connector_logo,
            connector_color: db.connector_color,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewPluggyConnection> for PluggyConnectionDB {
    fn from(domain: NewPluggyConnection) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: String::new(),
            item_id: domain.item_id,
            connector_name: domain.connector_name,
            connector_logo: domain.connector_logo,
            connector_color: domain.connector_color,
            status: CONNECTION_STATUS_CONNECTED.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_status_round_trips_through_strings() {
        for status in [
            ConnectionStatus::Connected,
            ConnectionStatus::Updating,
            ConnectionStatus::Error,
        ] {
            assert_eq!(
                ConnectionStatus::from_str(status.as_str()).unwrap(),
                status
            );
        }
        assert!(ConnectionStatus::from_str("DISABLED").is_err());
    }
}
