//! Spreadsheet export of messages and audit logs
//!
//! Rows are built from the full fetched set. Console filters never reach
//! this module.

use serde::Serialize;

use crate::domain::{AuditLogEntry, Message};
use crate::error::DomainError;

pub const MESSAGE_COLUMNS: [&str; 10] = [
    "Name",
    "National ID",
    "Email",
    "Origin Department",
    "Destination Department",
    "Type",
    "Message",
    "Protocol",
    "Hash",
    "Created At",
];

pub const LOG_COLUMNS: [&str; 5] = ["User", "Action", "Status", "IP", "Timestamp"];

/// One worksheet: a header row of column names plus text rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: &str, columns: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Turns a sheet into a downloadable spreadsheet file.
pub trait SpreadsheetExporter: Send + Sync {
    fn content_type(&self) -> &'static str;
    fn export(&self, sheet: &Sheet) -> Result<Vec<u8>, DomainError>;
}

pub fn messages_sheet(messages: &[Message]) -> Sheet {
    let mut sheet = Sheet::new("Messages", &MESSAGE_COLUMNS);
    sheet.rows = messages
        .iter()
        .map(|m| {
            vec![
                m.sender_name.clone(),
                m.sender_national_id.clone(),
                m.sender_email.clone(),
                m.sender_department.clone(),
                m.target_department.clone(),
                m.message_type.as_str().to_string(),
                m.body.clone(),
                m.protocol.clone(),
                m.content_hash.clone(),
                m.created_at.to_rfc3339(),
            ]
        })
        .collect();
    sheet
}

pub fn logs_sheet(entries: &[AuditLogEntry]) -> Sheet {
    let mut sheet = Sheet::new("Logs", &LOG_COLUMNS);
    sheet.rows = entries
        .iter()
        .map(|e| {
            vec![
                e.user_id.map(|id| id.to_string()).unwrap_or_default(),
                e.action.clone(),
                e.status.clone(),
                e.ip.clone().unwrap_or_default(),
                e.timestamp.to_rfc3339(),
            ]
        })
        .collect();
    sheet
}
