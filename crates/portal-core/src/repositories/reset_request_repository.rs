//! Password reset request repository trait (port)

use async_trait::async_trait;

use crate::domain::ResetRequest;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetRequestRepository: Send + Sync {
    async fn create(&self, request: &ResetRequest) -> Result<ResetRequest, DomainError>;
    async fn list_pending(&self) -> Result<Vec<ResetRequest>, DomainError>;
    /// Marks every pending request of `email` fulfilled, returning how many changed.
    async fn mark_fulfilled_by_email(&self, email: &str) -> Result<u64, DomainError>;
}
