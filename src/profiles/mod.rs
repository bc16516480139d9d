// Module declarations
pub(crate) mod profiles_errors;
pub(crate) mod profiles_model;
pub(crate) mod profiles_repository;
pub(crate) mod profiles_service;

// Re-export the public interface
pub use profiles_model::{NewProfile, Profile, ProfileDB, INVESTOR_PROFILES, RISK_TOLERANCES};
pub use profiles_repository::ProfileRepository;
pub use profiles_service::ProfileService;

// Re-export error types for convenience
pub use profiles_errors::{ProfileError, Result};
