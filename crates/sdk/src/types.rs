//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate. Priority and status
//! travel as wire strings so the SDK stays decoupled from the engine crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request to register a queue entry
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest {
    pub patient_id: i64,
    pub reason_for_visit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    /// One of: regular, senior, pwd, emergency (omitted = regular)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_date: Option<NaiveDate>,
}

/// Request to apply a status transition
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatusRequest {
    pub queue_id: String,
    /// One of: attending, attended, no_show
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_record_id: Option<i64>,
}

/// Request to reassign a queue entry
#[derive(Debug, Clone, Serialize)]
pub struct TransferRequest {
    pub queue_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_doctor_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_department_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub transferred_by: i64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ListTransfersRequest {
    pub queue_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SnapshotRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct DeleteRequest {
    pub queue_id: String,
}

/// A queue entry as returned by the daemon
#[derive(Debug, Clone, Deserialize)]
pub struct QueueEntryView {
    pub id: String,
    pub queue_number: i64,
    pub queue_date: NaiveDate,
    pub patient_id: i64,
    pub department_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub medical_record_id: Option<i64>,
    pub reason_for_visit: String,
    pub priority: String,
    pub status: String,
    pub called_at: Option<i64>,
    pub served_at: Option<i64>,
    pub estimated_wait_minutes: Option<i64>,
    pub created_at: i64,
}

/// A transfer history record
#[derive(Debug, Clone, Deserialize)]
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

#[derive(Debug, Clone, Deserialize)]
pub struct ListTransfersResponse {
    pub queue_id: String,
    pub transfers: Vec<TransferView>,
}

/// Per-status counts for a day's queue
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCounts {
    pub waiting: i64,
    pub attending: i64,
    pub attended: i64,
    pub no_show: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotResponse {
    pub date: NaiveDate,
    pub counts: StatusCounts,
    pub entries: Vec<QueueEntryView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteResponse {
    pub queue_id: String,
    pub deleted: bool,
}
