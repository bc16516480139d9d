use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::portfolios_errors::{PortfolioError, Result};

/// Domain model representing a portfolio in the system
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub total_value: f64,
    pub total_gain: f64,
    pub cdi_percent: f64,
    pub is_primary: bool,
    pub is_selected: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl NewPortfolio {
    /// Validates the new portfolio data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "Portfolio name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input model for renaming an existing portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioUpdate {
    pub id: String,
    pub name: String,
}

impl PortfolioUpdate {
    /// Validates the portfolio update data
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "Portfolio ID is required for updates".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(PortfolioError::InvalidData(
                "Portfolio name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for portfolios
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
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub name: String,
    pub total_value: f64,
    pub total_gain: f64,
    pub cdi_percent: f64,
    pub is_primary: bool,
    pub is_selected: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations
impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            total_value: db.total_value,
            total_gain: db.total_gain,
            cdi_percent: db.cdi_percent,
            is_primary: db.is_primary,
            is_selected: db.is_selected,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewPortfolio> for PortfolioDB {
    fn from(domain: NewPortfolio) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: domain.id.unwrap_or_default(),
            name: domain.name,
            total_value: 0.0,
            total_gain: 0.0,
            cdi_percent: 0.0,
            is_primary: false,
            is_selected: false,
            created_at: now,
            updated_at: now,
        }
    }
}
