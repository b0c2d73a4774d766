// Transfer Workflow Use Case
//
// A transfer reassigns doctor/department mid-lifecycle and records
// provenance. History row and assignment update commit together or not at
// all; status, queue number, priority and reason are never touched.

use serde::{Deserialize, Serialize};

use crate::application::{emit_audit, estimator, QueueSettings};
use crate::domain::{
    AuditAction, AuditEvent, DepartmentId, DoctorId, QueueEntryId, QueueTransfer, UserId,
};
use crate::error::{AppError, Result};
use crate::port::{
    AuditSink, DirectoryStore, IdProvider, QueueRepository, TimeProvider,
    TransactionalQueueRepository,
};

/// Transfer request. An absent field means "keep the current assignment".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub to_doctor_id: Option<DoctorId>,

    #[serde(default)]
    pub to_department_id: Option<DepartmentId>,

    #[serde(default)]
    pub reason: Option<String>,

    pub transferred_by: UserId,
}

/// Execute transfer use case.
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    tx_repo: &dyn TransactionalQueueRepository,
    repo: &dyn QueueRepository,
    directory: &dyn DirectoryStore,
    audit: &dyn AuditSink,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    settings: &QueueSettings,
    queue_id: &QueueEntryId,
    req: TransferRequest,
) -> Result<QueueTransfer> {
    // Directory checks are read-only, no need to hold the transaction open
    if let Some(doctor_id) = req.to_doctor_id {
        if directory.find_doctor(doctor_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Doctor {} not found", doctor_id)));
        }
    }
    if let Some(department_id) = req.to_department_id {
        if !directory.department_exists(department_id).await? {
            return Err(AppError::NotFound(format!(
                "Department {} not found",
                department_id
            )));
        }
    }

    let mut tx = tx_repo.begin_transaction().await?;

    let entry = match tx.find_entry(queue_id).await? {
        Some(entry) => entry,
        None => {
            tx.rollback().await?;
            return Err(AppError::NotFound(format!(
                "Queue entry {} not found",
                queue_id
            )));
        }
    };

    let new_doctor = req.to_doctor_id.or(entry.doctor_id);
    let new_department = req.to_department_id.or(entry.department_id);

    if new_doctor == entry.doctor_id && new_department == entry.department_id {
        tx.rollback().await?;
        return Err(AppError::NoOp(format!(
            "Queue entry {} already assigned to the requested doctor/department",
            queue_id
        )));
    }

    let transfer = QueueTransfer::new(
        id_provider.generate_id(),
        time_provider.now_millis(),
        queue_id.clone(),
        entry.doctor_id,
        new_doctor,
        entry.department_id,
        new_department,
        req.reason,
        req.transferred_by,
    );

    tx.insert_transfer(&transfer).await?;
    tx.update_assignment(queue_id, new_doctor, new_department)
        .await?;
    tx.commit().await?;

    emit_audit(
        audit,
        AuditEvent::new(
            AuditAction::Transferred,
            "queue_entry",
            queue_id,
            format!(
                "Queue entry #{} transferred (doctor {:?} -> {:?}, department {:?} -> {:?})",
                entry.queue_number,
                entry.doctor_id,
                new_doctor,
                entry.department_id,
                new_department
            ),
        )
        .with_before(serde_json::to_value(&entry)?)
        .with_after(serde_json::to_value(&transfer)?),
    )
    .await;

    // The new doctor's average changes the picture for everyone waiting
    estimator::recompute_for_date(repo, directory, settings, entry.queue_date).await;

    Ok(transfer)
}

/// Ordered transfer history for an entry (creation order).
pub async fn list_transfers(
    repo: &dyn QueueRepository,
    queue_id: &QueueEntryId,
) -> Result<Vec<QueueTransfer>> {
    if repo.find_by_id(queue_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Queue entry {} not found",
            queue_id
        )));
    }
    repo.find_transfers_by_queue(queue_id).await
}
