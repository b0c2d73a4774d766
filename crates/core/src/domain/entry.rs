// Queue Entry Domain Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Queue entry ID (UUID v4)
pub type QueueEntryId = String;

/// Directory references (owned by the external directory, referenced by id only)
pub type PatientId = i64;
pub type DoctorId = i64;
pub type DepartmentId = i64;
pub type MedicalRecordId = i64;
pub type UserId = i64;

/// Queue entry status.
///
/// Closed variant from the start; any future renames become a mapping layer
/// at the storage/API boundary, not a schema migration chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Waiting,
    Attending,
    Attended,
    NoShow,
}

impl QueueStatus {
    /// Terminal states permit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueStatus::Attended | QueueStatus::NoShow)
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(QueueStatus::Waiting),
            "attending" => Some(QueueStatus::Attending),
            "attended" => Some(QueueStatus::Attended),
            "no_show" => Some(QueueStatus::NoShow),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueueStatus::Waiting => write!(f, "waiting"),
            QueueStatus::Attending => write!(f, "attending"),
            QueueStatus::Attended => write!(f, "attended"),
            QueueStatus::NoShow => write!(f, "no_show"),
        }
    }
}

/// Visit priority. Priority patients are served out of strict arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Regular,
    Senior,
    Pwd,
    Emergency,
}

impl Priority {
    /// Serving tier (lower = served first). Senior and PWD share a tier and
    /// tie-break by arrival.
    pub fn serving_rank(&self) -> u8 {
        match self {
            Priority::Emergency => 0,
            Priority::Senior | Priority::Pwd => 1,
            Priority::Regular => 2,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Priority::Regular),
            "senior" => Some(Priority::Senior),
            "pwd" => Some(Priority::Pwd),
            "emergency" => Some(Priority::Emergency),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Regular => write!(f, "regular"),
            Priority::Senior => write!(f, "senior"),
            Priority::Pwd => write!(f, "pwd"),
            Priority::Emergency => write!(f, "emergency"),
        }
    }
}

/// One patient's visit record in the day's service queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    /// Positive, unique within (queue_number, queue_date).
    pub queue_number: i64,
    pub queue_date: NaiveDate,
    /// Required, immutable after creation.
    pub patient_id: PatientId,
    pub department_id: Option<DepartmentId>,
    pub doctor_id: Option<DoctorId>,
    /// Set only when status reaches `attended` and a record is linked.
    pub medical_record_id: Option<MedicalRecordId>,
    pub reason_for_visit: String,
    pub priority: Priority,
    pub status: QueueStatus,
    pub called_at: Option<i64>,
    pub served_at: Option<i64>,
    /// Advisory only; recomputed opportunistically, never authoritative
    /// for ordering.
    pub estimated_wait_minutes: Option<i64>,
    pub created_at: i64, // epoch ms
}

impl QueueEntry {
    /// Create a new waiting entry.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique entry ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `queue_number` - Number allocated for `queue_date`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        queue_number: i64,
        queue_date: NaiveDate,
        patient_id: PatientId,
        reason_for_visit: impl Into<String>,
        priority: Priority,
        department_id: Option<DepartmentId>,
        doctor_id: Option<DoctorId>,
    ) -> Self {
        Self {
            id: id.into(),
            queue_number,
            queue_date,
            patient_id,
            department_id,
            doctor_id,
            medical_record_id: None,
            reason_for_visit: reason_for_visit.into(),
            priority,
            status: QueueStatus::Waiting,
            called_at: None,
            served_at: None,
            estimated_wait_minutes: None,
            created_at,
        }
    }

    /// Transition waiting -> attending with explicit timestamp
    pub fn call(&mut self, now_millis: i64) -> crate::domain::error::Result<()> {
        if self.status != QueueStatus::Waiting {
            return Err(self.invalid_transition(QueueStatus::Attending));
        }
        self.status = QueueStatus::Attending;
        self.called_at = Some(now_millis);
        Ok(())
    }

    /// Transition attending -> attended with explicit timestamp.
    /// May optionally link a medical record.
    pub fn finish(
        &mut self,
        now_millis: i64,
        medical_record_id: Option<MedicalRecordId>,
    ) -> crate::domain::error::Result<()> {
        if self.status != QueueStatus::Attending {
            return Err(self.invalid_transition(QueueStatus::Attended));
        }
        self.status = QueueStatus::Attended;
        self.served_at = Some(now_millis);
        if medical_record_id.is_some() {
            self.medical_record_id = medical_record_id;
        }
        Ok(())
    }

    /// Transition waiting|attending -> no_show. No timestamp side effects.
    pub fn mark_no_show(&mut self) -> crate::domain::error::Result<()> {
        if self.status.is_terminal() {
            return Err(self.invalid_transition(QueueStatus::NoShow));
        }
        self.status = QueueStatus::NoShow;
        Ok(())
    }

    /// Apply a requested target status through the state machine.
    ///
    /// Any move not covered by `call`/`finish`/`mark_no_show` fails with
    /// `InvalidTransition` and leaves the entry unchanged.
    pub fn apply_status(
        &mut self,
        target: QueueStatus,
        now_millis: i64,
        medical_record_id: Option<MedicalRecordId>,
    ) -> crate::domain::error::Result<()> {
        match target {
            QueueStatus::Attending => self.call(now_millis),
            QueueStatus::Attended => self.finish(now_millis, medical_record_id),
            QueueStatus::NoShow => self.mark_no_show(),
            QueueStatus::Waiting => Err(self.invalid_transition(QueueStatus::Waiting)),
        }
    }

    fn invalid_transition(&self, to: QueueStatus) -> crate::domain::DomainError {
        crate::domain::DomainError::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}
