//! Best-effort audit trail
//!
//! Audit writes never fail the operation that triggered them: a store error
//! is logged locally and swallowed.

use std::sync::Arc;

use tracing::error;
use uuid::Uuid;

use crate::domain::{AuditAction, AuditLogEntry, AuditStatus};
use crate::repositories::AuditLogRepository;

#[derive(Clone)]
pub struct AuditTrail {
    logs: Arc<dyn AuditLogRepository>,
}

impl AuditTrail {
    pub fn new(logs: Arc<dyn AuditLogRepository>) -> Self {
        Self { logs }
    }

    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        action: AuditAction,
        status: AuditStatus,
        ip: Option<String>,
    ) {
        let entry = AuditLogEntry::new(user_id, action, status, ip);
        if let Err(e) = self.logs.append(&entry).await {
            error!(
                "Failed to write audit entry '{}' ({}): {}",
                entry.action, entry.status, e
            );
        }
    }
}
