// SQLite AuditSink Implementation
//
// Local append-only audit_log table. Stands in for the hospital's external
// compliance sink; callers already treat emission as best-effort.

use async_trait::async_trait;
use medq_core::domain::AuditEvent;
use medq_core::error::Result;
use medq_core::port::{AuditSink, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::queue_repository::map_sqlx_error;

pub struct SqliteAuditSink {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteAuditSink {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn emit(&self, event: AuditEvent) -> Result<()> {
        let before = event.before.as_ref().map(|v| v.to_string());
        let after = event.after.as_ref().map(|v| v.to_string());

        sqlx::query(
            r#"
            INSERT INTO audit_log (
                action, entity_type, entity_id, description,
                before_state, after_state, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.action.to_string())
        .bind(&event.entity_type)
        .bind(&event.entity_id)
        .bind(&event.description)
        .bind(&before)
        .bind(&after)
        .bind(self.time_provider.now_millis())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
