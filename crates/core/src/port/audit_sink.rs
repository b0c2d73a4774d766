// Audit Sink Port (Interface)

use crate::domain::AuditEvent;
use crate::error::Result;
use async_trait::async_trait;

/// External consumer of mutation descriptions for compliance logging.
///
/// Emission is best-effort: a failing sink must never roll back or block the
/// primary queue mutation (use cases log the failure and move on).
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn emit(&self, event: AuditEvent) -> Result<()>;
}
