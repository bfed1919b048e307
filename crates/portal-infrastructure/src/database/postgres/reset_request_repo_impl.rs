// ============================================================================
// Portal Infrastructure - PostgreSQL Reset Request Repository
// File: crates/portal-infrastructure/src/database/postgres/reset_request_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use portal_core::domain::ResetRequest;
use portal_core::error::DomainError;
use portal_core::repositories::ResetRequestRepository;

pub struct PgResetRequestRepository {
    pool: PgPool,
}

impl PgResetRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ResetRequestRow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub user_email: String,
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ResetRequestRow> for ResetRequest {
    fn from(row: ResetRequestRow) -> Self {
        ResetRequest {
            id: row.id,
            employee_id: row.employee_id,
            user_email: row.user_email,
            fulfilled: row.fulfilled,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ResetRequestRepository for PgResetRequestRepository {
    async fn create(&self, request: &ResetRequest) -> Result<ResetRequest, DomainError> {
        let row: ResetRequestRow = sqlx::query_as(
            r#"
            INSERT INTO reset_requests (id, employee_id, user_email, fulfilled, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, employee_id, user_email, fulfilled, created_at
            "#,
        )
        .bind(request.id)
        .bind(request.employee_id)
        .bind(&request.user_email)
        .bind(request.fulfilled)
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating reset request: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn list_pending(&self) -> Result<Vec<ResetRequest>, DomainError> {
        let rows: Vec<ResetRequestRow> = sqlx::query_as(
            r#"
            SELECT id, employee_id, user_email, fulfilled, created_at
            FROM reset_requests
            WHERE NOT fulfilled
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing reset requests: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_fulfilled_by_email(&self, email: &str) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE reset_requests SET fulfilled = TRUE WHERE LOWER(user_email) = LOWER($1) AND NOT fulfilled",
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error fulfilling reset requests: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        info!("Closed {} reset requests", result.rows_affected());
        Ok(result.rows_affected())
    }
}
