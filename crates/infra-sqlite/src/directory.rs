// SQLite DirectoryStore Implementation
//
// Read-only adapter over the directory tables. In production these are
// maintained by the directory service; this adapter never writes them.

use async_trait::async_trait;
use medq_core::domain::{DepartmentId, DoctorId, PatientId};
use medq_core::error::Result;
use medq_core::port::{DirectoryStore, DoctorProfile};
use sqlx::SqlitePool;

use crate::queue_repository::map_sqlx_error;

pub struct SqliteDirectoryStore {
    pool: SqlitePool,
}

impl SqliteDirectoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for SqliteDirectoryStore {
    async fn patient_exists(&self, id: PatientId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patients WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn department_exists(&self, id: DepartmentId) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count > 0)
    }

    async fn find_doctor(&self, id: DoctorId) -> Result<Option<DoctorProfile>> {
        let row: Option<(i64, Option<i64>)> =
            sqlx::query_as("SELECT id, avg_consultation_minutes FROM doctors WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(row.map(|(id, avg_consultation_minutes)| DoctorProfile {
            id,
            avg_consultation_minutes,
        }))
    }
}
