// SQLite QueueRepository Implementation

use crate::SqliteQueueTransaction;
use async_trait::async_trait;
use chrono::NaiveDate;
use medq_core::domain::{Priority, QueueEntry, QueueEntryId, QueueStatus, QueueTransfer};
use medq_core::error::{AppError, Result};
use medq_core::port::{QueueRepository, QueueRepositoryTransaction, TransactionalQueueRepository};
use sqlx::SqlitePool;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // Extract database-specific error code and message
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => {
                        // UNIQUE constraint failed. The only application-level
                        // unique constraint is (queue_date, queue_number), so
                        // this is the numbering allocator's retry signal.
                        AppError::DuplicateNumber(format!(
                            "Unique constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "787" | "3850" => {
                        // FOREIGN KEY constraint failed
                        AppError::Database(format!(
                            "Foreign key constraint violation: {} ({})",
                            db_err.message(),
                            code_str
                        ))
                    }
                    "5" => {
                        // SQLITE_BUSY - database is locked
                        AppError::Database(format!(
                            "Database locked (SQLITE_BUSY): {}",
                            db_err.message()
                        ))
                    }
                    "13" => {
                        // SQLITE_FULL - database or disk is full
                        AppError::Database(format!("Database full: {}", db_err.message()))
                    }
                    _ => {
                        // Other database errors
                        AppError::Database(format!(
                            "Database error [{}]: {}",
                            code_str,
                            db_err.message()
                        ))
                    }
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => {
            // Connection, pool, protocol errors
            AppError::Database(err.to_string())
        }
    }
}

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn find_by_id(&self, id: &QueueEntryId) -> Result<Option<QueueEntry>> {
        let row = sqlx::query_as::<_, EntryRow>("SELECT * FROM queue_entries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_entry()))
    }

    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<QueueEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"
            SELECT * FROM queue_entries
            WHERE queue_date = ?
            ORDER BY queue_number ASC
            "#,
        )
        .bind(date.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|row| row.into_entry()).collect())
    }

    async fn update_status(
        &self,
        id: &QueueEntryId,
        expected: QueueStatus,
        entry: &QueueEntry,
    ) -> Result<()> {
        // Conditional update: only applies while the stored status still
        // matches what the caller read, so a concurrent transition cannot be
        // silently overwritten.
        let result = sqlx::query(
            r#"
            UPDATE queue_entries
            SET status = ?, called_at = ?, served_at = ?, medical_record_id = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(entry.status.to_string())
        .bind(entry.called_at)
        .bind(entry.served_at)
        .bind(entry.medical_record_id)
        .bind(id)
        .bind(expected.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            // Entry might not exist, or someone else won the transition race
            let current: Option<String> =
                sqlx::query_scalar("SELECT status FROM queue_entries WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

            match current {
                None => Err(AppError::NotFound(format!("Queue entry {} not found", id))),
                Some(current_status) => Err(AppError::Domain(
                    medq_core::domain::DomainError::InvalidTransition {
                        from: current_status,
                        to: entry.status.to_string(),
                    },
                )),
            }
        } else {
            Ok(())
        }
    }

    async fn update_wait_estimates(
        &self,
        estimates: &[(QueueEntryId, Option<i64>)],
    ) -> Result<()> {
        for (id, minutes) in estimates {
            sqlx::query("UPDATE queue_entries SET estimated_wait_minutes = ? WHERE id = ?")
                .bind(minutes)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        Ok(())
    }

    async fn delete(&self, id: &QueueEntryId) -> Result<()> {
        let result = sqlx::query("DELETE FROM queue_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Queue entry {} not found", id)));
        }
        Ok(())
    }

    async fn find_transfers_by_queue(&self, queue_id: &QueueEntryId) -> Result<Vec<QueueTransfer>> {
        let rows: Vec<TransferRow> = sqlx::query_as(
            r#"
            SELECT * FROM queue_transfers
            WHERE queue_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(queue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|row| row.into_transfer()).collect())
    }
}

#[async_trait]
impl TransactionalQueueRepository for SqliteQueueRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn QueueRepositoryTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteQueueTransaction::new(tx)))
    }
}

/// SQLite row representation of a queue entry
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EntryRow {
    id: String,
    queue_number: i64,
    queue_date: String,
    patient_id: i64,
    department_id: Option<i64>,
    doctor_id: Option<i64>,
    medical_record_id: Option<i64>,
    reason_for_visit: String,
    priority: String,
    status: String,
    called_at: Option<i64>,
    served_at: Option<i64>,
    estimated_wait_minutes: Option<i64>,
    created_at: i64,
}

impl EntryRow {
    pub(crate) fn into_entry(self) -> QueueEntry {
        // Unknown strings should not occur behind the closed enums; fall
        // back to the column defaults rather than dropping the row.
        let status = QueueStatus::parse(&self.status).unwrap_or(QueueStatus::Waiting);
        let priority = Priority::parse(&self.priority).unwrap_or(Priority::Regular);
        let queue_date = self.queue_date.parse::<NaiveDate>().unwrap_or_default();

        QueueEntry {
            id: self.id,
            queue_number: self.queue_number,
            queue_date,
            patient_id: self.patient_id,
            department_id: self.department_id,
            doctor_id: self.doctor_id,
            medical_record_id: self.medical_record_id,
            reason_for_visit: self.reason_for_visit,
            priority,
            status,
            called_at: self.called_at,
            served_at: self.served_at,
            estimated_wait_minutes: self.estimated_wait_minutes,
            created_at: self.created_at,
        }
    }
}

/// SQLite row representation of a transfer
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct TransferRow {
    id: String,
    queue_id: String,
    from_doctor_id: Option<i64>,
    to_doctor_id: Option<i64>,
    from_department_id: Option<i64>,
    to_department_id: Option<i64>,
    reason: Option<String>,
    transferred_by: i64,
    created_at: i64,
}

impl TransferRow {
    pub(crate) fn into_transfer(self) -> QueueTransfer {
        QueueTransfer {
            id: self.id,
            queue_id: self.queue_id,
            from_doctor_id: self.from_doctor_id,
            to_doctor_id: self.to_doctor_id,
            from_department_id: self.from_department_id,
            to_department_id: self.to_department_id,
            reason: self.reason,
            transferred_by: self.transferred_by,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use medq_core::port::Transaction;

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn entry(id: &str, number: i64, date: &str) -> QueueEntry {
        QueueEntry::new(
            id,
            1_000,
            number,
            date.parse().unwrap(),
            1,
            "checkup",
            Priority::Regular,
            None,
            None,
        )
    }

    async fn insert(pool: &SqlitePool, e: &QueueEntry) {
        let repo = SqliteQueueRepository::new(pool.clone());
        let mut tx = repo.begin_transaction().await.unwrap();
        tx.insert_entry(e).await.unwrap();
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let pool = setup_test_db().await;
        let repo = SqliteQueueRepository::new(pool.clone());

        let e = entry("e1", 1, "2024-01-10");
        insert(&pool, &e).await;

        let found = repo.find_by_id(&e.id).await.unwrap().unwrap();
        assert_eq!(found.id, e.id);
        assert_eq!(found.queue_number, 1);
        assert_eq!(found.queue_date, e.queue_date);
        assert_eq!(found.status, QueueStatus::Waiting);
    }

    #[tokio::test]
    async fn test_duplicate_number_is_classified() {
        let pool = setup_test_db().await;
        let repo = SqliteQueueRepository::new(pool.clone());

        insert(&pool, &entry("e1", 1, "2024-01-10")).await;

        let mut tx = repo.begin_transaction().await.unwrap();
        let err = tx.insert_entry(&entry("e2", 1, "2024-01-10")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateNumber(_)));
        tx.rollback().await.unwrap();

        // Same number on a different date is fine
        insert(&pool, &entry("e3", 1, "2024-01-11")).await;
    }

    #[tokio::test]
    async fn test_conditional_update_rejects_stale_status() {
        let pool = setup_test_db().await;
        let repo = SqliteQueueRepository::new(pool.clone());

        let e = entry("e1", 1, "2024-01-10");
        insert(&pool, &e).await;

        let mut attending = e.clone();
        attending.call(2_000).unwrap();
        repo.update_status(&e.id, QueueStatus::Waiting, &attending)
            .await
            .unwrap();

        // Stale writer still believes the entry is waiting
        let err = repo
            .update_status(&e.id, QueueStatus::Waiting, &attending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));

        let err = repo
            .update_status(&"missing".to_string(), QueueStatus::Waiting, &attending)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_entry() {
        let pool = setup_test_db().await;
        let repo = SqliteQueueRepository::new(pool.clone());

        let err = repo.delete(&"nope".to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_wait_estimates_round_trip() {
        let pool = setup_test_db().await;
        let repo = SqliteQueueRepository::new(pool.clone());

        let e = entry("e1", 1, "2024-01-10");
        insert(&pool, &e).await;

        repo.update_wait_estimates(&[(e.id.clone(), Some(30))])
            .await
            .unwrap();
        let found = repo.find_by_id(&e.id).await.unwrap().unwrap();
        assert_eq!(found.estimated_wait_minutes, Some(30));
    }
}
