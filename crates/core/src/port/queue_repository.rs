// Queue Repository Port (Interface)

use crate::domain::{QueueEntry, QueueEntryId, QueueStatus, QueueTransfer};
use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Repository interface for QueueEntry persistence
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Find entry by ID
    async fn find_by_id(&self, id: &QueueEntryId) -> Result<Option<QueueEntry>>;

    /// All entries belonging to a calendar date, queue_number ascending
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<QueueEntry>>;

    /// Persist a status transition, conditional on the expected prior status.
    ///
    /// The update must only apply while the stored status still equals
    /// `expected`; a concurrent loser gets `InvalidTransition` (stale state),
    /// a missing entry gets `NotFound`. Writes status, called_at, served_at
    /// and medical_record_id from `entry`.
    async fn update_status(
        &self,
        id: &QueueEntryId,
        expected: QueueStatus,
        entry: &QueueEntry,
    ) -> Result<()>;

    /// Batch-store advisory wait estimates (id, minutes) pairs
    async fn update_wait_estimates(
        &self,
        estimates: &[(QueueEntryId, Option<i64>)],
    ) -> Result<()>;

    /// Remove an entry (administrative override). `NotFound` if absent.
    async fn delete(&self, id: &QueueEntryId) -> Result<()>;

    /// Transfer history for an entry, creation order
    async fn find_transfers_by_queue(&self, queue_id: &QueueEntryId) -> Result<Vec<QueueTransfer>>;
}
