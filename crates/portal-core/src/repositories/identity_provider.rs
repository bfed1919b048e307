//! Identity provider trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Account;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies the credentials and records the sign-in time.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, DomainError>;
    /// Fails with `EmailAlreadyExists` when the email is taken.
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, DomainError>;
    async fn update_password(&self, id: &Uuid, password: &str) -> Result<(), DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;
    async fn list_accounts(&self) -> Result<Vec<Account>, DomainError>;
}
