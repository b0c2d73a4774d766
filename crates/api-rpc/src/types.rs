//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use chrono::NaiveDate;
use medq_core::application::snapshot::{QueueSnapshot, StatusCounts};
use medq_core::domain::{Priority, QueueEntry, QueueStatus, QueueTransfer};
use serde::{Deserialize, Serialize};

/// queue.create.v1 - Register a queue entry
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
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

/// queue.update_status.v1 - Apply a state-machine transition
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub queue_id: String,
    pub status: QueueStatus,
    #[serde(default)]
    pub medical_record_id: Option<i64>,
}

/// queue.transfer.v1 - Reassign doctor/department
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub queue_id: String,
    #[serde(default)]
    pub to_doctor_id: Option<i64>,
    #[serde(default)]
    pub to_department_id: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
    pub transferred_by: i64,
}

/// queue.transfers.v1 - List transfer history
#[derive(Debug, Deserialize)]
pub struct ListTransfersRequest {
    pub queue_id: String,
}

/// queue.snapshot.v1 - Serving-order snapshot for a date
#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    /// Omitted = facility-local today
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// queue.delete.v1 - Administrative delete
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub queue_id: String,
}

/// Wire view of a queue entry
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntryView {
    pub id: String,
    pub queue_number: i64,
    pub queue_date: NaiveDate,
    pub patient_id: i64,
    pub department_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub medical_record_id: Option<i64>,
    pub reason_for_visit: String,
    pub priority: Priority,
    pub status: QueueStatus,
    pub called_at: Option<i64>,
    pub served_at: Option<i64>,
    pub estimated_wait_minutes: Option<i64>,
    pub created_at: i64,
}

impl From<QueueEntry> for QueueEntryView {
    fn from(entry: QueueEntry) -> Self {
        Self {
            id: entry.id,
            queue_number: entry.queue_number,
            queue_date: entry.queue_date,
            patient_id: entry.patient_id,
            department_id: entry.department_id,
            doctor_id: entry.doctor_id,
            medical_record_id: entry.medical_record_id,
            reason_for_visit: entry.reason_for_visit,
            priority: entry.priority,
            status: entry.status,
            called_at: entry.called_at,
            served_at: entry.served_at,
            estimated_wait_minutes: entry.estimated_wait_minutes,
            created_at: entry.created_at,
        }
    }
}

/// Wire view of a transfer record
#[derive(Debug, Clone, Serialize)]
pub struct TransferView {
    pub id: String,
    pub queue_id: String,
    pub from_doctor_id: Option<i64>,
    pub to_doctor_id: Option<i64>,
    pub from_department_id: Option<i64>,
    pub to_department_id: Option<i64>,
    pub reason: Option<String>,
    pub transferred_by: i64,
    pub created_at: i64,
}

impl From<QueueTransfer> for TransferView {
    fn from(transfer: QueueTransfer) -> Self {
        Self {
            id: transfer.id,
            queue_id: transfer.queue_id,
            from_doctor_id: transfer.from_doctor_id,
            to_doctor_id: transfer.to_doctor_id,
            from_department_id: transfer.from_department_id,
            to_department_id: transfer.to_department_id,
            reason: transfer.reason,
            transferred_by: transfer.transferred_by,
            created_at: transfer.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListTransfersResponse {
    pub queue_id: String,
    pub transfers: Vec<TransferView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnapshotResponse {
    pub date: NaiveDate,
    pub counts: StatusCounts,
    pub entries: Vec<QueueEntryView>,
}

impl From<QueueSnapshot> for SnapshotResponse {
    fn from(snapshot: QueueSnapshot) -> Self {
        Self {
            date: snapshot.date,
            counts: snapshot.counts,
            entries: snapshot
                .entries
                .into_iter()
                .map(QueueEntryView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub queue_id: String,
    pub deleted: bool,
}
