//! Password reset request

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Created by an employee, fulfilled by an admin after the password change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub user_email: String,
    pub fulfilled: bool,
    pub created_at: DateTime<Utc>,
}

impl ResetRequest {
    pub fn new(employee_id: Uuid, user_email: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            user_email: portal_shared::utils::normalize_email(user_email),
            fulfilled: false,
            created_at: Utc::now(),
        }
    }
}
