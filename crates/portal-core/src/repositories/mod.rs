//! Repository traits (ports)

pub mod audit_log_repository;
pub mod employee_repository;
pub mod identity_provider;
pub mod message_repository;
pub mod reset_request_repository;

pub use audit_log_repository::AuditLogRepository;
pub use employee_repository::EmployeeRepository;
pub use identity_provider::IdentityProvider;
pub use message_repository::MessageRepository;
pub use reset_request_repository::ResetRequestRepository;
