//! Application services

pub mod admin_service;
pub mod audit;
pub mod auth_service;
pub mod export;
pub mod protocol;
pub mod receipt;
pub mod submission_service;

pub use admin_service::{AdminService, CreateEmployee, DeleteEmployee, FulfilResetRequest, SetEmployeeActive};
pub use audit::AuditTrail;
pub use auth_service::{AuthService, LoginResult, Registration};
pub use export::{ExportFile, Sheet, SpreadsheetExporter};
pub use protocol::{CountingSequencer, ProtocolGenerator, ProtocolSequencer};
pub use receipt::{ReceiptRenderer, RenderedDocument, Receipt, TextReceiptRenderer};
pub use submission_service::{SentMessage, SubmissionService, SubmitFailure};
