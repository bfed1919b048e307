// ============================================================================
// Portal Core - Employee Entity
// File: crates/portal-core/src/domain/employee.rs
// Description: Internal directory record of an employee
// ============================================================================

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

fn national_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{3}\.?\d{3}\.?\d{3}-?\d{2}$").expect("national id pattern is valid")
    })
}

/// Directory record. Text fields are never absent: stores that return a
/// NULL name, national id, department or phone map it to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Uuid,
    pub full_name: String,
    pub national_id: String,
    pub department: String,
    pub phone: String,
    pub email: String,
    pub is_admin: bool,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Activate employee
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Block employee (soft delete)
    pub fn block(&mut self) {
        self.active = false;
    }

    pub fn matches_email(&self, email: &str) -> bool {
        portal_shared::utils::normalize_email(&self.email) == portal_shared::utils::normalize_email(email)
    }
}

/// Input for self-registration and admin creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewEmployee {
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "National ID is required"))]
    pub national_id: String,

    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

impl NewEmployee {
    /// Field validation plus national id shape (`000.000.000-00`, punctuation optional).
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate()?;
        if !national_id_pattern().is_match(self.national_id.trim()) {
            return Err(DomainError::ValidationError(format!(
                "national_id: invalid format '{}'",
                self.national_id
            )));
        }
        Ok(())
    }

    pub fn into_employee(self, is_admin: bool) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            full_name: self.full_name.trim().to_string(),
            national_id: self.national_id.trim().to_string(),
            department: self.department.trim().to_string(),
            phone: self.phone.map(|p| p.trim().to_string()).unwrap_or_default(),
            email: portal_shared::utils::normalize_email(&self.email),
            is_admin,
            active: true,
            created_at: Utc::now(),
        }
    }
}
