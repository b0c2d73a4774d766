// Medq Infrastructure - SQLite Adapter
// Implements: QueueRepository, TransactionalQueueRepository, DirectoryStore, AuditSink

mod audit;
mod connection;
mod directory;
mod migration;
mod queue_repository;
mod transaction;

pub use audit::SqliteAuditSink;
pub use connection::create_pool;
pub use directory::SqliteDirectoryStore;
pub use migration::run_migrations;
pub use queue_repository::SqliteQueueRepository;
pub use transaction::SqliteQueueTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
