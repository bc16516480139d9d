use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::movements_constants::*;
use super::movements_errors::{MovementError, Result};

/// Domain model representing one ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub portfolio_id: String,
    pub movement_type: String,
    pub asset_name: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_value: f64,
    pub from_portfolio_name: Option<String>,
    pub to_portfolio_name: Option<String>,
    pub movement_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Database model for movements
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::movements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MovementDB {
    pub id: String,
    pub portfolio_id: String,
    pub movement_type: String,
    pub asset_name: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_value: f64,
    pub from_portfolio_name: Option<String>,
    pub to_portfolio_name: Option<String>,
    pub movement_date: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a new movement
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub portfolio_id: String,
    pub movement_type: String,
    pub asset_name: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    pub from_portfolio_name: Option<String>,
    pub to_portfolio_name: Option<String>,
    pub movement_date: Option<DateTime<Utc>>,
}

impl NewMovement {
    /// Validates the new movement data
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(MovementError::InvalidData(
                "Portfolio ID cannot be empty".to_string(),
            ));
        }
        if self.asset_name.trim().is_empty() {
            return Err(MovementError::InvalidData(
                "Asset name cannot be empty".to_string(),
            ));
        }
        if MovementType::from_str(&self.movement_type).is_err() {
            return Err(MovementError::InvalidData(format!(
                "Unknown movement type: {}",
                self.movement_type
            )));
        }
        if self.quantity <= 0.0 {
            return Err(MovementError::InvalidData(
                "Quantity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Enum representing the supported movement types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MovementType {
    Application,
    Redemption,
    TransferIn,
    TransferOut,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Application => MOVEMENT_TYPE_APPLICATION,
            MovementType::Redemption => MOVEMENT_TYPE_REDEMPTION,
            MovementType::TransferIn => MOVEMENT_TYPE_TRANSFER_IN,
            MovementType::TransferOut => MOVEMENT_TYPE_TRANSFER_OUT,
        }
    }
}

impl FromStr for MovementType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == MOVEMENT_TYPE_APPLICATION => Ok(MovementType::Application),
            s if s == MOVEMENT_TYPE_REDEMPTION => Ok(MovementType::Redemption),
            s if s == MOVEMENT_TYPE_TRANSFER_IN => Ok(MovementType::TransferIn),
            s if s == MOVEMENT_TYPE_TRANSFER_OUT => Ok(MovementType::TransferOut),
            _ => Err(format!("Unknown movement type: {}", s)),
        }
    }
}

// Conversion implementations
impl From<MovementDB> for Movement {
    fn from(db: MovementDB) -> Self {
        Self {
            id: db.id,
            portfolio_id: db.portfolio_id,
            movement_type: db.movement_type,
            asset_name: db.asset_name,
            ticker: db.ticker,
            quantity: db.quantity,
            unit_price: db.unit_price,
            total_value: db.total_value,
            from_portfolio_name: db.from_portfolio_name,
            to_portfolio_name: db.to_portfolio_name,
            movement_date: DateTime::from_naive_utc_and_offset(db.movement_date, Utc),
            created_at: DateTime::from_naive_utc_and_offset(db.created_at, Utc),
        }
    }
}

impl From<NewMovement> for MovementDB {
    fn from(domain: NewMovement) -> Self {
        let now = Utc::now().naive_utc();
        let total_value = domain.quantity * domain.unit_price;
        Self {
            id: String::new(),
            portfolio_id: domain.portfolio_id,
            movement_type: domain.movement_type,
            asset_name: domain.asset_name,
            ticker: domain.ticker,
            quantity: domain.quantity,
            unit_price: domain.unit_price,
            total_value,
            from_portfolio_name: domain.from_portfolio_name,
            to_portfolio_name: domain.to_portfolio_name,
            movement_date: domain.movement_date.map(|d| d.naive_utc()).unwrap_or(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_type_round_trips_through_strings() {
        for label in MOVEMENT_TYPES {
            let parsed = MovementType::from_str(label).unwrap();
            assert_eq!(parsed.as_str(), label);
        }
    }

    #[test]
    fn unknown_movement_type_is_rejected() {
        assert!(MovementType::from_str("DIVIDEND").is_err());

        let movement = NewMovement {
            portfolio_id: "p1".to_string(),
            movement_type: "DIVIDEND".to_string(),
            asset_name: "PETR4".to_string(),
            ticker: Some("PETR4".to_string()),
            quantity: 1.0,
            unit_price: 30.0,
            from_portfolio_name: None,
            to_portfolio_name: None,
            movement_date: None,
        };
        assert!(movement.validate().is_err());
    }
}
