//! Audit log entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actions recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    Logout,
    Register,
    SentMessage,
    ResetRequested,
    ResetFulfilled,
    EmployeeCreated,
    EmployeeBlocked,
    EmployeeActivated,
    EmployeeDeleted,
    ExportedMessages,
    ExportedLogs,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::Logout => "logout",
            AuditAction::Register => "register",
            AuditAction::SentMessage => "sent message",
            AuditAction::ResetRequested => "reset requested",
            AuditAction::ResetFulfilled => "reset fulfilled",
            AuditAction::EmployeeCreated => "employee created",
            AuditAction::EmployeeBlocked => "employee blocked",
            AuditAction::EmployeeActivated => "employee activated",
            AuditAction::EmployeeDeleted => "employee deleted",
            AuditAction::ExportedMessages => "exported messages",
            AuditAction::ExportedLogs => "exported logs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "success",
            AuditStatus::Failure => "failure",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub status: String,
    pub ip: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(user_id: Option<Uuid>, action: AuditAction, status: AuditStatus, ip: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action: action.as_str().to_string(),
            status: status.as_str().to_string(),
            ip,
            timestamp: Utc::now(),
        }
    }
}
