// ============================================================================
// Portal Infrastructure - PostgreSQL Audit Log Repository
// File: crates/portal-infrastructure/src/database/postgres/audit_log_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::error;
use uuid::Uuid;

use portal_core::domain::AuditLogEntry;
use portal_core::error::DomainError;
use portal_core::repositories::AuditLogRepository;

pub struct PgAuditLogRepository {
    pool: PgPool,
}

impl PgAuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditLogRow {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub status: String,
    pub ip: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<AuditLogRow> for AuditLogEntry {
    fn from(row: AuditLogRow) -> Self {
        AuditLogEntry {
            id: row.id,
            user_id: row.user_id,
            action: row.action,
            status: row.status,
            ip: row.ip,
            timestamp: row.timestamp,
        }
    }
}

#[async_trait]
impl AuditLogRepository for PgAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, user_id, action, status, ip, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.status)
        .bind(&entry.ip)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error appending audit entry: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<AuditLogEntry>, DomainError> {
        let rows: Vec<AuditLogRow> = sqlx::query_as(
            "SELECT id, user_id, action, status, ip, timestamp FROM audit_logs ORDER BY timestamp DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing audit entries: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
