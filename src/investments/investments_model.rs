use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::investments_constants::SOURCE_MANUAL;
use super::investments_errors::{InvestmentError, Result};

/// Domain model representing a single position held in a portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub portfolio_id: String,
    pub asset_name: String,
    pub asset_type: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub total_invested: f64,
    pub current_value: f64,
    pub gain_percent: f64,
    pub source: String,
    pub maturity_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for investments
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct InvestmentDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_name: String,
    pub asset_type: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub total_invested: f64,
    pub current_value: f64,
    pub gain_percent: f64,
    pub source: String,
    pub maturity_date: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for an application (aporte) into a portfolio
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub portfolio_id: String,
    pub asset_name: String,
    pub asset_type: String,
    pub ticker: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub source: Option<String>,
    pub maturity_date: Option<String>,
}

impl NewApplication {
    /// Validates the application data
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Portfolio ID cannot be empty".to_string(),
            ));
        }
        if self.asset_name.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Asset name cannot be empty".to_string(),
            ));
        }
        if self.asset_type.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Asset type cannot be empty".to_string(),
            ));
        }
        if self.quantity <= 0.0 {
            return Err(InvestmentError::InvalidData(
                "Quantity must be greater than zero".to_string(),
            ));
        }
        if self.unit_price < 0.0 {
            return Err(InvestmentError::InvalidData(
                "Unit price cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(SOURCE_MANUAL)
    }
}

/// Input model for a redemption (resgate) from a position
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewRedemption {
    pub investment_id: String,
    pub quantity: f64,
}

impl NewRedemption {
    /// Validates the redemption data
    pub fn validate(&self) -> Result<()> {
        if self.investment_id.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Investment ID cannot be empty".to_string(),
            ));
        }
        if self.quantity <= 0.0 {
            return Err(InvestmentError::InvalidData(
                "Redemption quantity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input model for transferring part of a position between portfolios
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub investment_id: String,
    pub to_portfolio_id: String,
    pub quantity: f64,
}

impl NewTransfer {
    /// Validates the transfer data
    pub fn validate(&self) -> Result<()> {
        if self.investment_id.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Investment ID cannot be empty".to_string(),
            ));
        }
        if self.to_portfolio_id.trim().is_empty() {
            return Err(InvestmentError::InvalidData(
                "Destination portfolio ID cannot be empty".to_string(),
            ));
        }
        if self.quantity <= 0.0 {
            return Err(InvestmentError::InvalidData(
                "Transfer quantity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a redemption: the position either survives with reduced
/// quantity or is deleted entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedemptionOutcome {
    Partial(Investment),
    Closed { investment_id: String },
}

// Conversion implementations
impl From<InvestmentDB> for Investment {
    fn from(db: InvestmentDB) -> Self {
        Self {
            id: db.id,
            portfolio_id: db.portfolio_id,
            asset_name: db.asset_name,
            asset_type: db.asset_type,
            ticker: db.ticker,
            quantity: db.quantity,
            purchase_price: db.purchase_price,
            current_price: db.current_price,
            total_invested: db.total_invested,
            current_value: db.current_value,
            gain_percent: db.gain_percent,
            source: db.source,
            maturity_date: db.maturity_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<NewApplication> for InvestmentDB {
    fn from(domain: NewApplication) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let total = domain.quantity * domain.unit_price;
        let source = domain.source().to_string();
        Self {
            id: String::new(),
            portfolio_id: domain.portfolio_id,
            asset_name: domain.asset_name,
            asset_type: domain.asset_type,
            ticker: domain.ticker,
            quantity: domain.quantity,
            purchase_price: domain.unit_price,
            current_price: domain.unit_price,
            total_invested: total,
            current_value: total,
            gain_percent: 0.0,
            source,
            maturity_date: domain.maturity_date,
            created_at: now,
            updated_at: now,
        }
    }
}
