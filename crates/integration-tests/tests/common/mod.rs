//! Shared test harness
//!
//! Every test runs against a real in-memory SQLite database with the
//! directory tables seeded the way a small clinic would look.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use medq_core::application::registration::{self, CreateEntryRequest};
use medq_core::application::QueueSettings;
use medq_core::domain::{AuditEvent, Priority, QueueEntry};
use medq_core::error::{AppError, Result};
use medq_core::port::id_provider::UuidProvider;
use medq_core::port::time_provider::SystemTimeProvider;
use medq_core::port::AuditSink;
use medq_infra_sqlite::{
    create_pool, run_migrations, SqliteDirectoryStore, SqliteQueueRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Audit sink that records emitted events for assertions.
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub async fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn emit(&self, event: AuditEvent) -> Result<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Audit sink that always fails; mutations must survive it.
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn emit(&self, _event: AuditEvent) -> Result<()> {
        Err(AppError::Internal("audit backend offline".to_string()))
    }
}

pub struct Harness {
    pub pool: SqlitePool,
    pub repo: Arc<SqliteQueueRepository>,
    pub directory: Arc<SqliteDirectoryStore>,
    pub audit: Arc<RecordingAuditSink>,
    pub id_provider: Arc<UuidProvider>,
    pub time_provider: Arc<SystemTimeProvider>,
    pub settings: QueueSettings,
}

impl Harness {
    pub async fn new() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        seed_directory(&pool).await;

        Self {
            repo: Arc::new(SqliteQueueRepository::new(pool.clone())),
            directory: Arc::new(SqliteDirectoryStore::new(pool.clone())),
            audit: Arc::new(RecordingAuditSink::default()),
            id_provider: Arc::new(UuidProvider),
            time_provider: Arc::new(SystemTimeProvider),
            settings: QueueSettings::default(),
            pool,
        }
    }

    /// Register an entry through the real create use case.
    pub async fn create_entry(&self, req: CreateEntryRequest) -> Result<QueueEntry> {
        registration::create::execute(
            self.repo.as_ref(),
            self.repo.as_ref(),
            self.directory.as_ref(),
            self.audit.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            &self.settings,
            req,
        )
        .await
    }
}

/// Minimal create request; tweak fields per test.
pub fn create_request(patient_id: i64) -> CreateEntryRequest {
    CreateEntryRequest {
        patient_id,
        reason_for_visit: "routine checkup".to_string(),
        department_id: None,
        doctor_id: None,
        priority: Priority::Regular,
        queue_date: Some(date(2024, 1, 10)),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Patients 1-3, departments 1-2, doctors 7 (10 min), 9 (20 min) and
/// 11 (no recorded average).
async fn seed_directory(pool: &SqlitePool) {
    sqlx::query(
        "INSERT INTO patients (id, full_name) VALUES
             (1, 'Alice Reyes'), (2, 'Ben Cruz'), (3, 'Carla Santos')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO departments (id, name) VALUES
             (1, 'General Medicine'), (2, 'Pediatrics')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO doctors (id, full_name, department_id, avg_consultation_minutes) VALUES
             (7, 'Dr. Lim', 1, 10),
             (9, 'Dr. Ong', 1, 20),
             (11, 'Dr. Tan', 2, NULL)",
    )
    .execute(pool)
    .await
    .unwrap();
}
