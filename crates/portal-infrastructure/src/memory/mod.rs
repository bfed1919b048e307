//! In-process adapters for local runs and tests. Nothing survives a restart.

mod stores;

pub use stores::{
    InMemoryAuditLogRepository, InMemoryEmployeeRepository, InMemoryIdentityProvider,
    InMemoryMessageRepository, InMemoryResetRequestRepository,
};
