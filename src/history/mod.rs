// Module declarations
pub(crate) mod history_model;
pub(crate) mod history_repository;
pub(crate) mod history_service;

// Re-export the public interface
pub use history_model::HistorySnapshot;
pub use history_repository::HistoryRepository;
pub use history_service::HistoryService;
