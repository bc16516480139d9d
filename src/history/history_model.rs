use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One per-day valuation snapshot of a portfolio
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolio_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct HistorySnapshot {
    pub id: String,
    pub portfolio_id: String,
    pub date: String,
    pub total_value: f64,
    pub total_gain: f64,
}
