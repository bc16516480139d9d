// Module declarations
pub(crate) mod connections_errors;
pub(crate) mod connections_model;
pub(crate) mod connections_repository;
pub(crate) mod connections_service;
pub mod providers;

// Re-export the public interface
pub use connections_model::{
    ConnectionStatus, NewPluggyConnection, PluggyConnection, PluggyConnectionDB, PluggyPosition,
    SyncReport, CONNECTION_STATUS_CONNECTED, CONNECTION_STATUS_ERROR, CONNECTION_STATUS_UPDATING,
};
pub use connections_repository::ConnectionRepository;
pub use connections_service::ConnectionService;
pub use providers::{PluggyFunctionsProvider, PluggyProvider};

// Re-export error types for convenience
pub use connections_errors::{ConnectionError, Result};
