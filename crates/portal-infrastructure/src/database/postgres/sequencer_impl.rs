// ============================================================================
// Portal Infrastructure - Atomic Daily Sequencer
// File: crates/portal-infrastructure/src/database/postgres/sequencer_impl.rs
// ============================================================================
//! Per-day counter row bumped in a single upsert, so concurrent submissions
//! always receive distinct numbers. The first call of a day seeds the
//! counter from the messages already stored for that day.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{debug, error};

use portal_core::error::DomainError;
use portal_core::services::ProtocolSequencer;

/// The counter row is seeded at one and only ever grows, so anything below
/// one means the table was tampered with.
fn sequence_from_counter(value: i64) -> Result<u64, DomainError> {
    if value < 1 {
        error!("Daily sequence counter returned invalid value {}", value);
        return Err(DomainError::DatabaseError(format!(
            "daily sequence counter holds invalid value {}",
            value
        )));
    }
    Ok(value as u64)
}

pub struct PgDailySequencer {
    pool: PgPool,
}

impl PgDailySequencer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProtocolSequencer for PgDailySequencer {
    async fn next_sequence(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO message_daily_sequences (day, last_value)
            VALUES (
                $1,
                (SELECT COUNT(*) FROM messages WHERE created_at >= $2 AND created_at < $3) + 1
            )
            ON CONFLICT (day) DO UPDATE
                SET last_value = message_daily_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
        .bind(day_start.date_naive())
        .bind(day_start)
        .bind(day_end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error advancing daily sequence: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let value: i64 = row.get("last_value");
        debug!("Daily sequence for {} advanced to {}", day_start.date_naive(), value);
        sequence_from_counter(value)
    }
}
