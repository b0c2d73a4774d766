// Directory Port (Interface)
//
// Patients, doctors and departments are owned by the external directory;
// the queue core reads them by id and never writes.

use crate::domain::{DepartmentId, DoctorId, PatientId};
use crate::error::Result;
use async_trait::async_trait;

/// Doctor attributes the queue core cares about
#[derive(Debug, Clone)]
pub struct DoctorProfile {
    pub id: DoctorId,
    /// Rolling average consultation length; feeds the wait-time estimator.
    pub avg_consultation_minutes: Option<i64>,
}

/// Read-only lookup into the patient/doctor/department directory
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn patient_exists(&self, id: PatientId) -> Result<bool>;

    async fn department_exists(&self, id: DepartmentId) -> Result<bool>;

    async fn find_doctor(&self, id: DoctorId) -> Result<Option<DoctorProfile>>;
}
