//! Audit log repository trait (port)

use async_trait::async_trait;

use crate::domain::AuditLogEntry;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError>;
    /// All entries, newest first.
    async fn list_recent(&self) -> Result<Vec<AuditLogEntry>, DomainError>;
}
