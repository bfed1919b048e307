// ============================================================================
// Portal Infrastructure - PostgreSQL Identity Provider
// File: crates/portal-infrastructure/src/database/postgres/identity_provider_impl.rs
// ============================================================================
//! Password accounts kept in the portal database, hashed with argon2.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info, warn};
use uuid::Uuid;

use portal_core::domain::Account;
use portal_core::error::DomainError;
use portal_core::repositories::IdentityProvider;
use portal_security::PasswordService;
use portal_shared::utils::normalize_email;

pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            last_sign_in_at: row.last_sign_in_at,
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, DomainError> {
        let account = self
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !PasswordService::verify(password, &account.password_hash)? {
            warn!("Password mismatch for account {}", account.id);
            return Err(DomainError::InvalidCredentials);
        }

        let row: AccountRow = sqlx::query_as(
            r#"
            UPDATE accounts SET last_sign_in_at = NOW()
            WHERE id = $1
            RETURNING id, email, password_hash, created_at, last_sign_in_at
            "#,
        )
        .bind(account.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error recording sign-in: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Account, DomainError> {
        let account = Account::new(email, PasswordService::hash(password)?);
        info!("Creating account: {}", account.id);

        let row: AccountRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, created_at, last_sign_in_at
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            if is_unique_violation(&e) {
                return DomainError::EmailAlreadyExists(account.email.clone());
            }
            error!("Database error creating account: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update_password(&self, id: &Uuid, password: &str) -> Result<(), DomainError> {
        let hash = PasswordService::hash(password)?;
        let result = sqlx::query("UPDATE accounts SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error updating password: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::AccountNotFound);
        }
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, email, password_hash, created_at, last_sign_in_at
            FROM accounts
            WHERE LOWER(email) = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding account: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, DomainError> {
        let rows: Vec<AccountRow> = sqlx::query_as(
            "SELECT id, email, password_hash, created_at, last_sign_in_at FROM accounts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing accounts: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
