pub mod db;

pub mod analytics;
pub mod connections;
pub mod history;
pub mod investments;
pub mod market_data;
pub mod movements;
pub mod portfolios;
pub mod profiles;

pub mod constants;
pub mod errors;
pub mod schema;

pub use errors::{Error, Result};
