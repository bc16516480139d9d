use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for profile-related operations
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Profile already exists for user {0}")]
    AlreadyExists(String),
}

impl From<DieselError> for ProfileError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ProfileError::NotFound("Record not found".to_string()),
            _ => ProfileError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;
