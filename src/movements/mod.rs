// Module declarations
pub(crate) mod movements_constants;
pub(crate) mod movements_errors;
pub(crate) mod movements_model;
pub(crate) mod movements_repository;
pub(crate) mod movements_service;

// Re-export the public interface
pub use movements_constants::*;
pub use movements_model::{Movement, MovementDB, MovementType, NewMovement};
pub use movements_repository::MovementRepository;
pub use movements_service::MovementService;

// Re-export error types for convenience
pub use movements_errors::{MovementError, Result};
