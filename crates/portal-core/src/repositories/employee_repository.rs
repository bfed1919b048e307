//! Employee directory repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Employee;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Employee>, DomainError>;
    /// Case-insensitive match on the trimmed email.
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DomainError>;
    async fn create(&self, employee: &Employee) -> Result<Employee, DomainError>;
    async fn set_active(&self, id: &Uuid, active: bool) -> Result<Employee, DomainError>;
    /// Hard delete. Only reachable when legacy deletion is enabled.
    async fn delete(&self, id: &Uuid) -> Result<(), DomainError>;
}
