// Create Queue Entry Use Case
//
// Numbering allocation runs inside a transaction: read max(queue_number) for
// the date, insert with max + 1, and let the (queue_date, queue_number)
// uniqueness constraint catch concurrent winners. The loser rolls back and
// retries; exhaustion surfaces DuplicateNumber, which means the
// serialization guarantee itself failed and deserves alerting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::application::{emit_audit, estimator, QueueSettings};
use crate::domain::{AuditAction, AuditEvent, Priority, QueueEntry};
use crate::error::{AppError, Result};
use crate::port::{
    AuditSink, DirectoryStore, IdProvider, QueueRepository, TimeProvider,
    TransactionalQueueRepository,
};

/// Upper bound on the free-text visit reason
pub const MAX_REASON_LEN: usize = 500;

/// Create request (queue_date omitted = facility-local today)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntryRequest {
    pub patient_id: i64,
    pub reason_for_visit: String,

    #[serde(default)]
    pub department_id: Option<i64>,

    #[serde(default)]
    pub doctor_id: Option<i64>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub queue_date: Option<NaiveDate>,
}

/// Field-level validation, before any directory lookups
pub fn validate_request(req: &CreateEntryRequest) -> Result<()> {
    if req.patient_id <= 0 {
        return Err(AppError::Validation(
            "patient_id is required and must be positive".to_string(),
        ));
    }

    let reason = req.reason_for_visit.trim();
    if reason.is_empty() {
        return Err(AppError::Validation(
            "reason_for_visit must not be empty".to_string(),
        ));
    }
    if reason.len() > MAX_REASON_LEN {
        return Err(AppError::Validation(format!(
            "reason_for_visit too long ({} > {} chars)",
            reason.len(),
            MAX_REASON_LEN
        )));
    }

    Ok(())
}

/// Execute create-entry use case.
///
/// Validates the request against the directory, allocates the next queue
/// number for the date transactionally, emits a `Created` audit event and
/// refreshes the day's wait estimates.
#[allow(clippy::too_many_arguments)]
pub async fn execute(
    tx_repo: &dyn TransactionalQueueRepository,
    repo: &dyn QueueRepository,
    directory: &dyn DirectoryStore,
    audit: &dyn AuditSink,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    settings: &QueueSettings,
    req: CreateEntryRequest,
) -> Result<QueueEntry> {
    validate_request(&req)?;

    if !directory.patient_exists(req.patient_id).await? {
        return Err(AppError::NotFound(format!(
            "Patient {} not found",
            req.patient_id
        )));
    }
    if let Some(department_id) = req.department_id {
        if !directory.department_exists(department_id).await? {
            return Err(AppError::NotFound(format!(
                "Department {} not found",
                department_id
            )));
        }
    }
    if let Some(doctor_id) = req.doctor_id {
        if directory.find_doctor(doctor_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Doctor {} not found", doctor_id)));
        }
    }

    let now = time_provider.now_millis();
    let date = req.queue_date.unwrap_or_else(|| settings.facility_date(now));
    let entry_id = id_provider.generate_id();

    let mut attempt: u32 = 0;
    let entry = loop {
        let mut tx = tx_repo.begin_transaction().await?;

        let next_number = tx.max_number_for_date(date).await?.unwrap_or(0) + 1;
        let entry = QueueEntry::new(
            entry_id.clone(),
            now,
            next_number,
            date,
            req.patient_id,
            req.reason_for_visit.trim(),
            req.priority,
            req.department_id,
            req.doctor_id,
        );

        match tx.insert_entry(&entry).await {
            Ok(()) => {
                tx.commit().await?;
                break entry;
            }
            Err(AppError::DuplicateNumber(msg)) => {
                if let Err(e) = tx.rollback().await {
                    warn!(error = %e, "rollback after number conflict failed");
                }
                attempt += 1;
                if attempt >= settings.max_number_retries {
                    error!(
                        %date,
                        attempts = attempt,
                        "queue number allocation exhausted retries; \
                         numbering serialization guarantee violated"
                    );
                    return Err(AppError::DuplicateNumber(msg));
                }
                warn!(%date, attempt, "queue number conflict, retrying allocation");
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after insert failure failed");
                }
                return Err(e);
            }
        }
    };

    emit_audit(
        audit,
        AuditEvent::new(
            AuditAction::Created,
            "queue_entry",
            &entry.id,
            format!(
                "Queue entry #{} registered for patient {} on {}",
                entry.queue_number, entry.patient_id, entry.queue_date
            ),
        )
        .with_after(serde_json::to_value(&entry)?),
    )
    .await;

    estimator::recompute_for_date(repo, directory, settings, date).await;

    Ok(entry)
}
