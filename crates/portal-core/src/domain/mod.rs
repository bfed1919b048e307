//! # Portal Core - Domain Module
//!
//! Domain entities for the feedback portal.

pub mod account;
pub mod audit_log;
pub mod command;
pub mod department;
pub mod employee;
pub mod message;
pub mod reset_request;

// Re-export all entities and enums
pub use account::Account;
pub use audit_log::{AuditAction, AuditLogEntry, AuditStatus};
pub use command::{CommandOutcome, Confirmed};
pub use department::DepartmentCatalogue;
pub use employee::{Employee, NewEmployee};
pub use message::{Message, MessageDraft, MessageFilter, MessageType, ProtocolStamp, SubmissionState};
pub use reset_request::ResetRequest;
