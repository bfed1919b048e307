//! # Portal Infrastructure
//!
//! Storage and export implementations (adapters) for the portal ports.

pub mod database;
pub mod export;
pub mod memory;

pub use database::{
    create_pool, PgAuditLogRepository, PgDailySequencer, PgEmployeeRepository, PgIdentityProvider,
    PgMessageRepository, PgResetRequestRepository,
};
pub use export::{PdfReceiptRenderer, XlsxExporter};
pub use memory::{
    InMemoryAuditLogRepository, InMemoryEmployeeRepository, InMemoryIdentityProvider,
    InMemoryMessageRepository, InMemoryResetRequestRepository,
};
