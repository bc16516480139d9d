use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for investment-related operations
#[derive(Debug, Error)]
pub enum InvestmentError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Insufficient quantity: {0}")]
    InsufficientQuantity(String),
}

impl From<DieselError> for InvestmentError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => InvestmentError::NotFound("Record not found".to_string()),
            _ => InvestmentError::DatabaseError(err.to_string()),
        }
    }
}

impl From<InvestmentError> for String {
    fn from(error: InvestmentError) -> Self {
        error.to_string()
    }
}

/// Result type for investment operations
pub type Result<T> = std::result::Result<T, InvestmentError>;
