// ============================================================================
// Portal Core - Message Entity
// File: crates/portal-core/src/domain/message.rs
// Description: Draft and sent messages, and the submission state machine
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::Employee;

/// Message type enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Suggestion,
    Complaint,
    Report,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Suggestion => "suggestion",
            MessageType::Complaint => "complaint",
            MessageType::Report => "report",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "suggestion" => Some(MessageType::Suggestion),
            "complaint" => Some(MessageType::Complaint),
            "report" => Some(MessageType::Report),
            _ => None,
        }
    }
}

/// In-progress form content. Carries no protocol and no hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MessageDraft {
    #[serde(default)]
    pub message_type: MessageType,

    #[validate(length(min = 1, message = "Destination department is required"))]
    pub target_department: String,

    #[validate(length(min = 1, message = "Message body is required"))]
    pub body: String,
}

/// Receipt fields assigned once, at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStamp {
    pub protocol: String,
    pub content_hash: String,
}

/// A sent message. Immutable once persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub message_type: MessageType,
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

impl Message {
    /// Seals a draft into a message. The draft is consumed: there is no way
    /// back from a sealed message to an editable one.
    pub fn seal(
        draft: MessageDraft,
        sender: &Employee,
        sender_email: &str,
        stamp: ProtocolStamp,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            message_type: draft.message_type,
            target_department: draft.target_department,
            body: draft.body,
            sender_name: sender.full_name.clone(),
            sender_national_id: sender.national_id.clone(),
            sender_email: sender_email.to_string(),
            sender_department: sender.department.clone(),
            protocol: stamp.protocol,
            content_hash: stamp.content_hash,
            created_at,
        }
    }
}

/// Lifecycle of one submission: `Draft -> Sent`, with `Sent` terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    Draft(MessageDraft),
    Sent(Message),
}

impl SubmissionState {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmissionState::Sent(_))
    }

    pub fn protocol(&self) -> Option<&str> {
        match self {
            SubmissionState::Draft(_) => None,
            SubmissionState::Sent(m) => Some(&m.protocol),
        }
    }

    pub fn content_hash(&self) -> Option<&str> {
        match self {
            SubmissionState::Draft(_) => None,
            SubmissionState::Sent(m) => Some(&m.content_hash),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SubmissionState::Draft(_) => "draft",
            SubmissionState::Sent(_) => "sent",
        }
    }
}

/// Admin console filters. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub message_type: Option<MessageType>,
    pub department: Option<String>,
    pub date: Option<NaiveDate>,
}

impl MessageFilter {
    pub fn matches(&self, message: &Message) -> bool {
        let type_ok = self.message_type.map_or(true, |t| message.message_type == t);
        let department_ok = self
            .department
            .as_deref()
            .filter(|d| !d.is_empty())
            .map_or(true, |d| message.target_department == d);
        let date_ok = self
            .date
            .map_or(true, |d| message.created_at.date_naive() == d);
        type_ok && department_ok && date_ok
    }

    pub fn apply<'a>(&self, messages: &'a [Message]) -> Vec<&'a Message> {
        messages.iter().filter(|m| self.matches(m)).collect()
    }
}
