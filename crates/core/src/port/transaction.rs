// Transaction port for atomic operations

use crate::domain::{DepartmentId, DoctorId, QueueEntry, QueueEntryId, QueueTransfer};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional QueueRepository operations
#[async_trait]
pub trait TransactionalQueueRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>>;
}

/// QueueRepository operations within a transaction
#[async_trait]
pub trait QueueRepositoryTransaction: Transaction {
    /// Highest queue_number already assigned for a date (within transaction)
    async fn max_number_for_date(&mut self, date: NaiveDate) -> Result<Option<i64>>;

    /// Insert entry (within transaction). Surfaces `DuplicateNumber` when the
    /// (queue_date, queue_number) uniqueness constraint trips.
    async fn insert_entry(&mut self, entry: &QueueEntry) -> Result<()>;

    /// Load entry for update (within transaction)
    async fn find_entry(&mut self, id: &QueueEntryId) -> Result<Option<QueueEntry>>;

    /// Record an immutable transfer (within transaction)
    async fn insert_transfer(&mut self, transfer: &QueueTransfer) -> Result<()>;

    /// Reassign doctor/department in place (within transaction)
    async fn update_assignment(
        &mut self,
        id: &QueueEntryId,
        doctor_id: Option<DoctorId>,
        department_id: Option<DepartmentId>,
    ) -> Result<()>;
}
