// Domain Layer - Pure business logic and entities

pub mod audit;
pub mod entry;
pub mod error;
pub mod transfer;

// Re-exports
pub use audit::{AuditAction, AuditEvent};
pub use entry::{
    DepartmentId, DoctorId, MedicalRecordId, PatientId, Priority, QueueEntry, QueueEntryId,
    QueueStatus, UserId,
};
pub use error::DomainError;
pub use transfer::{QueueTransfer, TransferId};
