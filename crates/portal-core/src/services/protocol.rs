// ============================================================================
// Portal Core - Protocol Generator
// File: crates/portal-core/src/services/protocol.rs
// ============================================================================
//! Protocol numbering and content hashing for sent messages.
//!
//! A protocol has the form `#YYYYMMDD-NNNN`: the UTC submission date and a
//! 1-based daily sequence, zero-padded to four digits. Past 9999 the numeral
//! simply widens. The content hash is the lowercase hex SHA-256 of the body.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use portal_shared::constants::PROTOCOL_SEQUENCE_WIDTH;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ProtocolStamp;
use crate::error::DomainError;
use crate::repositories::MessageRepository;

/// Start (inclusive) and end (exclusive) of the UTC day containing `instant`.
pub fn day_bounds(instant: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = instant.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

pub fn format_protocol(date: NaiveDate, sequence: u64) -> String {
    format!(
        "#{}-{:0width$}",
        date.format("%Y%m%d"),
        sequence,
        width = PROTOCOL_SEQUENCE_WIDTH
    )
}

/// Builds the protocol for `instant` from the number of messages already
/// created that UTC day. `count_supplier` receives the day bounds.
///
/// Deterministic for a given count. Two callers that observe the same count
/// get the same protocol.
pub async fn compute_protocol<F, Fut>(
    instant: DateTime<Utc>,
    count_supplier: F,
) -> Result<String, DomainError>
where
    F: FnOnce(DateTime<Utc>, DateTime<Utc>) -> Fut,
    Fut: Future<Output = Result<u64, DomainError>>,
{
    let (start, end) = day_bounds(instant);
    let count = count_supplier(start, end).await?;
    Ok(format_protocol(instant.date_naive(), count + 1))
}

pub fn compute_content_hash(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Source of the daily sequence number.
#[async_trait]
pub trait ProtocolSequencer: Send + Sync {
    async fn next_sequence(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<u64, DomainError>;
}

/// Count-then-insert sequencing. The count and the later insert are not
/// atomic, so concurrent submissions on the same day can share a number.
pub struct CountingSequencer {
    messages: Arc<dyn MessageRepository>,
}

impl CountingSequencer {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }
}

#[async_trait]
impl ProtocolSequencer for CountingSequencer {
    async fn next_sequence(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let count = self
            .messages
            .count_created_between(day_start, day_end)
            .await?;
        Ok(count + 1)
    }
}

/// Assigns protocol and content hash to a submission.
#[derive(Clone)]
pub struct ProtocolGenerator {
    sequencer: Arc<dyn ProtocolSequencer>,
}

impl ProtocolGenerator {
    pub fn new(sequencer: Arc<dyn ProtocolSequencer>) -> Self {
        Self { sequencer }
    }

    pub async fn stamp(&self, instant: DateTime<Utc>, body: &str) -> Result<ProtocolStamp, DomainError> {
        let (start, end) = day_bounds(instant);
        let sequence = self.sequencer.next_sequence(start, end).await?;
        let stamp = ProtocolStamp {
            protocol: format_protocol(instant.date_naive(), sequence),
            content_hash: compute_content_hash(body),
        };
        debug!("Stamped submission with protocol {}", stamp.protocol);
        Ok(stamp)
    }
}
