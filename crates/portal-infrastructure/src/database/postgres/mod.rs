//! PostgreSQL repository implementations

pub mod audit_log_repo_impl;
pub mod employee_repo_impl;
pub mod identity_provider_impl;
pub mod message_repo_impl;
pub mod reset_request_repo_impl;
pub mod sequencer_impl;

pub use audit_log_repo_impl::PgAuditLogRepository;
pub use employee_repo_impl::PgEmployeeRepository;
pub use identity_provider_impl::PgIdentityProvider;
pub use message_repo_impl::PgMessageRepository;
pub use reset_request_repo_impl::PgResetRequestRepository;
pub use sequencer_impl::PgDailySequencer;
