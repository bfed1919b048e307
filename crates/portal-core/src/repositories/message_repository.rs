//! Message store repository trait (port)
//!
//! Messages are append-only: the port has no update or delete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Message;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<Message, DomainError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, DomainError>;
    /// All messages, newest first.
    async fn list_recent(&self) -> Result<Vec<Message>, DomainError>;
    /// Messages with `start <= created_at < end`.
    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, DomainError>;
}
