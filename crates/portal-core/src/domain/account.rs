//! Identity provider account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sign-in credentials as held by the identity provider. The directory
/// record for the same person is an [`crate::Employee`] matched by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
}

impl Account {
    pub fn new(email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: portal_shared::utils::normalize_email(email),
            password_hash,
            created_at: Utc::now(),
            last_sign_in_at: None,
        }
    }
}
