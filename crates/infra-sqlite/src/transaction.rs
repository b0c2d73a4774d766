// SQLite Transaction Implementation

use async_trait::async_trait;
use chrono::NaiveDate;
use medq_core::domain::{DepartmentId, DoctorId, QueueEntry, QueueEntryId, QueueTransfer};
use medq_core::error::Result;
use medq_core::port::{QueueRepositoryTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

use crate::queue_repository::map_sqlx_error;

pub struct SqliteQueueTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteQueueTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteQueueTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl QueueRepositoryTransaction for SqliteQueueTransaction<'_> {
    async fn max_number_for_date(&mut self, date: NaiveDate) -> Result<Option<i64>> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(queue_number) FROM queue_entries WHERE queue_date = ?")
                .bind(date.to_string())
                .fetch_one(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        Ok(max)
    }

    async fn insert_entry(&mut self, entry: &QueueEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queue_entries (
                id, queue_number, queue_date, patient_id,
                department_id, doctor_id, medical_record_id,
                reason_for_visit, priority, status,
                called_at, served_at, estimated_wait_minutes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.queue_number)
        .bind(entry.queue_date.to_string())
        .bind(entry.patient_id)
        .bind(entry.department_id)
        .bind(entry.doctor_id)
        .bind(entry.medical_record_id)
        .bind(&entry.reason_for_visit)
        .bind(entry.priority.to_string())
        .bind(entry.status.to_string())
        .bind(entry.called_at)
        .bind(entry.served_at)
        .bind(entry.estimated_wait_minutes)
        .bind(entry.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_entry(&mut self, id: &QueueEntryId) -> Result<Option<QueueEntry>> {
        let row = sqlx::query_as::<_, crate::queue_repository::EntryRow>(
            "SELECT * FROM queue_entries WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_entry()))
    }

    async fn insert_transfer(&mut self, transfer: &QueueTransfer) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queue_transfers (
                id, queue_id,
                from_doctor_id, to_doctor_id,
                from_department_id, to_department_id,
                reason, transferred_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transfer.id)
        .bind(&transfer.queue_id)
        .bind(transfer.from_doctor_id)
        .bind(transfer.to_doctor_id)
        .bind(transfer.from_department_id)
        .bind(transfer.to_department_id)
        .bind(&transfer.reason)
        .bind(transfer.transferred_by)
        .bind(transfer.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update_assignment(
        &mut self,
        id: &QueueEntryId,
        doctor_id: Option<DoctorId>,
        department_id: Option<DepartmentId>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE queue_entries
            SET doctor_id = ?, department_id = ?
            WHERE id = ?
            "#,
        )
        .bind(doctor_id)
        .bind(department_id)
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
