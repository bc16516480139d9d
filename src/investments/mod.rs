// Module declarations
pub(crate) mod investments_constants;
pub(crate) mod investments_errors;
pub(crate) mod investments_model;
pub(crate) mod investments_repository;
pub(crate) mod investments_service;
pub(crate) mod investments_traits;
pub mod position_math;

// Re-export the public interface
pub use investments_constants::*;
pub use investments_model::{
    Investment, InvestmentDB, NewApplication, NewRedemption, NewTransfer, RedemptionOutcome,
};
pub use investments_repository::InvestmentRepository;
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};

// Re-export error types for convenience
pub use investments_errors::{InvestmentError, Result};
