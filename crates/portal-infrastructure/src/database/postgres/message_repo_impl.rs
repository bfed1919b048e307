// ============================================================================
// Portal Infrastructure - PostgreSQL Message Repository
// File: crates/portal-infrastructure/src/database/postgres/message_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tracing::{error, info};
use uuid::Uuid;

use portal_core::domain::{Message, MessageType};
use portal_core::error::DomainError;
use portal_core::repositories::MessageRepository;

pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    pub id: Uuid,
    pub message_type: String,
    pub target_department: String,
    pub body: String,
    pub sender_name: String,
    pub sender_national_id: String,
    pub sender_email: String,
    pub sender_department: String,
    pub protocol: String,
    pub content_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Stored type tag to domain type. Rows written by the earlier portal use
/// the Portuguese tags; anything else is reported, never guessed.
fn decode_message_type(raw: &str) -> Result<MessageType, DomainError> {
    if let Some(kind) = MessageType::from_str(raw) {
        return Ok(kind);
    }
    match raw.trim().to_lowercase().as_str() {
        "sugestao" => Ok(MessageType::Suggestion),
        "reclamacao" => Ok(MessageType::Complaint),
        "denuncia" => Ok(MessageType::Report),
        other => Err(DomainError::DatabaseError(format!(
            "unknown message type '{}'",
            other
        ))),
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = DomainError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let message_type = decode_message_type(&row.message_type).map_err(|e| {
            error!("Message {} has an undecodable type: {}", row.id, e);
            e
        })?;
        Ok(Message {
            id: row.id,
            message_type,
            target_department: row.target_department,
            body: row.body,
            sender_name: row.sender_name,
            sender_national_id: row.sender_national_id,
            sender_email: row.sender_email,
            sender_department: row.sender_department,
            protocol: row.protocol,
            content_hash: row.content_hash,
            created_at: row.created_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, message_type, target_department, body, sender_name, \
    sender_national_id, sender_email, sender_department, protocol, content_hash, created_at";

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, DomainError> {
        info!("Inserting message {} with protocol {}", message.id, message.protocol);

        let row: MessageRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO messages (
                id, message_type, target_department, body, sender_name,
                sender_national_id, sender_email, sender_department,
                protocol, content_hash, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(message.id)
        .bind(message.message_type.as_str())
        .bind(&message.target_department)
        .bind(&message.body)
        .bind(&message.sender_name)
        .bind(&message.sender_national_id)
        .bind(&message.sender_email)
        .bind(&message.sender_department)
        .bind(&message.protocol)
        .bind(&message.content_hash)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error inserting message: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Message::try_from(row)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, DomainError> {
        let row: Option<MessageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM messages WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding message: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(Message::try_from).transpose()
    }

    async fn list_recent(&self) -> Result<Vec<Message>, DomainError> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {} FROM messages ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing messages: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        rows.into_iter().map(Message::try_from).collect()
    }

    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM messages WHERE created_at >= $1 AND created_at < $2")
            .bind(start)
            .bind(end)
            .fetch_one(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error counting messages: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        let total: i64 = row.get("total");
        Ok(total.max(0) as u64)
    }
}
