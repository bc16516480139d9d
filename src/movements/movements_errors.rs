use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for movement-related operations
#[derive(Debug, Error)]
pub enum MovementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for MovementError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => MovementError::NotFound("Record not found".to_string()),
            _ => MovementError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for movement operations
pub type Result<T> = std::result::Result<T, MovementError>;
