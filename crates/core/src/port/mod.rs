// Port Layer - Interfaces for external dependencies

pub mod audit_sink;
pub mod directory;
pub mod id_provider; // For deterministic testing
pub mod queue_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use audit_sink::AuditSink;
pub use directory::{DirectoryStore, DoctorProfile};
pub use id_provider::IdProvider;
pub use queue_repository::QueueRepository;
pub use time_provider::TimeProvider;
pub use transaction::{QueueRepositoryTransaction, Transaction, TransactionalQueueRepository};
