// ============================================================================
// Portal Infrastructure - PostgreSQL Employee Repository
// File: crates/portal-infrastructure/src/database/postgres/employee_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use portal_core::domain::Employee;
use portal_core::error::DomainError;
use portal_core::repositories::EmployeeRepository;

pub struct PgEmployeeRepository {
    pool: PgPool,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Legacy rows may hold NULLs; see `From<EmployeeRow>` for the defaults.
#[derive(Debug, FromRow)]
pub(crate) struct EmployeeRow {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub is_admin: Option<bool>,
    pub active: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            full_name: row.full_name.unwrap_or_default(),
            national_id: row.national_id.unwrap_or_default(),
            department: row.department.unwrap_or_default(),
            phone: row.phone.unwrap_or_default(),
            email: row.email,
            is_admin: row.is_admin.unwrap_or(false),
            active: row.active.unwrap_or(true),
            created_at: row.created_at,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, full_name, national_id, department, phone, email, is_admin, active, created_at";

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, DomainError> {
        let rows: Vec<EmployeeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM employees ORDER BY full_name ASC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing employees: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Employee>, DomainError> {
        let row: Option<EmployeeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM employees WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding employee by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DomainError> {
        let row: Option<EmployeeRow> = sqlx::query_as(&format!(
            "SELECT {} FROM employees WHERE LOWER(email) = LOWER(TRIM($1))",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding employee by email: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, employee: &Employee) -> Result<Employee, DomainError> {
        info!("Creating employee record: {}", employee.id);

        let row: EmployeeRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO employees (
                id, full_name, national_id, department, phone,
                email, is_admin, active, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(employee.id)
        .bind(&employee.full_name)
        .bind(&employee.national_id)
        .bind(&employee.department)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(employee.is_admin)
        .bind(employee.active)
        .bind(employee.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating employee: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn set_active(&self, id: &Uuid, active: bool) -> Result<Employee, DomainError> {
        let row: Option<EmployeeRow> = sqlx::query_as(&format!(
            "UPDATE employees SET active = $2 WHERE id = $1 RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating employee status: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        row.map(Into::into).ok_or(DomainError::EmployeeNotFound)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error deleting employee: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EmployeeNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_columns_take_defaults() {
        let row = EmployeeRow {
            id: Uuid::new_v4(),
            full_name: None,
            national_id: None,
            department: None,
            phone: None,
            email: "legacy@x.com".into(),
            is_admin: None,
            active: None,
            created_at: Utc::now(),
        };
        let employee: Employee = row.into();

        assert_eq!(employee.full_name, "");
        assert_eq!(employee.department, "");
        assert_eq!(employee.phone, "");
        assert!(!employee.is_admin);
        assert!(employee.active);
    }
}
