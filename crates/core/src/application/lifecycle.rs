// Queue Entry Lifecycle Use Cases
//
// Status transitions are persisted with a conditional update keyed on the
// prior status; two staff racing the same transition cannot both win, the
// loser gets InvalidTransition instead of silently overwriting.

use serde::{Deserialize, Serialize};

use crate::application::{emit_audit, estimator, QueueSettings};
use crate::domain::{
    AuditAction, AuditEvent, MedicalRecordId, QueueEntry, QueueEntryId, QueueStatus,
};
use crate::error::{AppError, Result};
use crate::port::{AuditSink, DirectoryStore, QueueRepository, TimeProvider};

/// Status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: QueueStatus,

    /// Only honored on the transition to `attended`.
    #[serde(default)]
    pub medical_record_id: Option<MedicalRecordId>,
}

/// Apply a state-machine transition to an entry.
pub async fn update_status(
    repo: &dyn QueueRepository,
    directory: &dyn DirectoryStore,
    audit: &dyn AuditSink,
    time_provider: &dyn TimeProvider,
    settings: &QueueSettings,
    id: &QueueEntryId,
    req: UpdateStatusRequest,
) -> Result<QueueEntry> {
    let entry = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Queue entry {} not found", id)))?;

    let prior_status = entry.status;
    let now = time_provider.now_millis();

    let mut updated = entry.clone();
    updated.apply_status(req.status, now, req.medical_record_id)?;

    // Conditional on prior_status: a concurrent winner already moved the
    // row, so the stale loser surfaces InvalidTransition here.
    repo.update_status(id, prior_status, &updated).await?;

    emit_audit(
        audit,
        AuditEvent::new(
            AuditAction::StatusChanged,
            "queue_entry",
            id,
            format!(
                "Queue entry #{} moved {} -> {}",
                updated.queue_number, prior_status, updated.status
            ),
        )
        .with_before(serde_json::to_value(&entry)?)
        .with_after(serde_json::to_value(&updated)?),
    )
    .await;

    estimator::recompute_for_date(repo, directory, settings, updated.queue_date).await;

    Ok(updated)
}

/// Delete an entry outright.
///
/// Destructive administrative override, permitted from any state and distinct
/// from the no_show terminal state. The audit event carries the entry's full
/// prior attributes for external logging.
pub async fn delete_entry(
    repo: &dyn QueueRepository,
    directory: &dyn DirectoryStore,
    audit: &dyn AuditSink,
    settings: &QueueSettings,
    id: &QueueEntryId,
) -> Result<QueueEntry> {
    let entry = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Queue entry {} not found", id)))?;

    repo.delete(id).await?;

    emit_audit(
        audit,
        AuditEvent::new(
            AuditAction::Deleted,
            "queue_entry",
            id,
            format!(
                "Queue entry #{} for {} deleted (administrative override, was {})",
                entry.queue_number, entry.queue_date, entry.status
            ),
        )
        .with_before(serde_json::to_value(&entry)?),
    )
    .await;

    estimator::recompute_for_date(repo, directory, settings, entry.queue_date).await;

    Ok(entry)
}
