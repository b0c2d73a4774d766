// Queue Transfer Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::entry::{DepartmentId, DoctorId, QueueEntryId, UserId};

/// Transfer ID (UUID v4)
pub type TransferId = String;

/// Reassignment of a queue entry's doctor/department, recording provenance.
///
/// A transfer is a historical fact: created exactly once per transfer action,
/// never edited or deleted. The full ordered history for an entry is
/// retrievable by `queue_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueTransfer {
    pub id: TransferId,
    pub queue_id: QueueEntryId,
    pub from_doctor_id: Option<DoctorId>,
    pub to_doctor_id: Option<DoctorId>,
    pub from_department_id: Option<DepartmentId>,
    pub to_department_id: Option<DepartmentId>,
    pub reason: Option<String>,
    pub transferred_by: UserId,
    pub created_at: i64, // epoch ms
}

impl QueueTransfer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        queue_id: impl Into<String>,
        from_doctor_id: Option<DoctorId>,
        to_doctor_id: Option<DoctorId>,
        from_department_id: Option<DepartmentId>,
        to_department_id: Option<DepartmentId>,
        reason: Option<String>,
        transferred_by: UserId,
    ) -> Self {
        Self {
            id: id.into(),
            queue_id: queue_id.into(),
            from_doctor_id,
            to_doctor_id,
            from_department_id,
            to_department_id,
            reason,
            transferred_by,
            created_at,
        }
    }
}
