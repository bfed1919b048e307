// ============================================================================
// Portal Core - Admin Console Service
// File: crates/portal-core/src/services/admin_service.rs
// ============================================================================
//! Read-only message and log views, exports, directory maintenance and
//! password reset fulfilment. Every call requires an admin session; every
//! mutating call takes a confirmed command.

use std::sync::Arc;

use portal_security::{PasswordService, SessionContext};
use portal_shared::constants::{LOGS_EXPORT_FILENAME, MESSAGES_EXPORT_FILENAME};
use portal_shared::utils::{mask_email, normalize_email};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    Account, AuditAction, AuditLogEntry, AuditStatus, CommandOutcome, Confirmed, DepartmentCatalogue,
    Employee, Message, MessageFilter, NewEmployee, ResetRequest,
};
use crate::error::DomainError;
use crate::repositories::{
    AuditLogRepository, EmployeeRepository, IdentityProvider, MessageRepository, ResetRequestRepository,
};
use crate::services::audit::AuditTrail;
use crate::services::export::{logs_sheet, messages_sheet, ExportFile, SpreadsheetExporter};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    #[serde(flatten)]
    pub employee: NewEmployee,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SetEmployeeActive {
    pub employee_id: Uuid,
    pub active: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteEmployee {
    pub employee_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FulfilResetRequest {
    pub email: String,
    pub new_password: String,
}

pub struct AdminService {
    employees: Arc<dyn EmployeeRepository>,
    messages: Arc<dyn MessageRepository>,
    logs: Arc<dyn AuditLogRepository>,
    reset_requests: Arc<dyn ResetRequestRepository>,
    identity: Arc<dyn IdentityProvider>,
    exporter: Arc<dyn SpreadsheetExporter>,
    audit: AuditTrail,
    departments: DepartmentCatalogue,
    hard_delete: bool,
}

impl AdminService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        messages: Arc<dyn MessageRepository>,
        logs: Arc<dyn AuditLogRepository>,
        reset_requests: Arc<dyn ResetRequestRepository>,
        identity: Arc<dyn IdentityProvider>,
        exporter: Arc<dyn SpreadsheetExporter>,
        audit: AuditTrail,
        departments: DepartmentCatalogue,
        hard_delete: bool,
    ) -> Self {
        Self {
            employees,
            messages,
            logs,
            reset_requests,
            identity,
            exporter,
            audit,
            departments,
            hard_delete,
        }
    }

    fn ensure_admin(session: &SessionContext) -> Result<(), DomainError> {
        if session.is_admin {
            Ok(())
        } else {
            warn!("Non-admin {} tried to reach the console", mask_email(&session.email));
            Err(DomainError::Forbidden("administrator access required".into()))
        }
    }

    /// Most recent first, narrowed by the console filters.
    pub async fn list_messages(
        &self,
        session: &SessionContext,
        filter: &MessageFilter,
    ) -> Result<Vec<Message>, DomainError> {
        Self::ensure_admin(session)?;
        let messages = self.messages.list_recent().await?;
        Ok(filter.apply(&messages).into_iter().cloned().collect())
    }

    /// Exports every fetched message. Console filters do not apply.
    pub async fn export_messages(
        &self,
        session: &SessionContext,
        ip: Option<String>,
    ) -> Result<ExportFile, DomainError> {
        Self::ensure_admin(session)?;
        let messages = self.messages.list_recent().await?;
        let bytes = self.exporter.export(&messages_sheet(&messages))?;
        info!("Exported {} messages", messages.len());
        self.audit
            .record(Some(session.account_id), AuditAction::ExportedMessages, AuditStatus::Success, ip)
            .await;
        Ok(ExportFile {
            filename: MESSAGES_EXPORT_FILENAME.to_string(),
            content_type: self.exporter.content_type(),
            bytes,
        })
    }

    pub async fn list_logs(&self, session: &SessionContext) -> Result<Vec<AuditLogEntry>, DomainError> {
        Self::ensure_admin(session)?;
        self.logs.list_recent().await
    }

    pub async fn export_logs(&self, session: &SessionContext, ip: Option<String>) -> Result<ExportFile, DomainError> {
        Self::ensure_admin(session)?;
        let entries = self.logs.list_recent().await?;
        let bytes = self.exporter.export(&logs_sheet(&entries))?;
        info!("Exported {} audit entries", entries.len());
        self.audit
            .record(Some(session.account_id), AuditAction::ExportedLogs, AuditStatus::Success, ip)
            .await;
        Ok(ExportFile {
            filename: LOGS_EXPORT_FILENAME.to_string(),
            content_type: self.exporter.content_type(),
            bytes,
        })
    }

    pub async fn list_employees(&self, session: &SessionContext) -> Result<Vec<Employee>, DomainError> {
        Self::ensure_admin(session)?;
        self.employees.list().await
    }

    pub async fn list_accounts(&self, session: &SessionContext) -> Result<Vec<Account>, DomainError> {
        Self::ensure_admin(session)?;
        self.identity.list_accounts().await
    }

    pub async fn list_pending_resets(&self, session: &SessionContext) -> Result<Vec<ResetRequest>, DomainError> {
        Self::ensure_admin(session)?;
        self.reset_requests.list_pending().await
    }

    /// Creates the identity account and the directory record for a new hire.
    pub async fn create_employee(
        &self,
        session: &SessionContext,
        command: Confirmed<CreateEmployee>,
        ip: Option<String>,
    ) -> Result<CommandOutcome<Employee>, DomainError> {
        Self::ensure_admin(session)?;
        let Some(CreateEmployee { employee, password, is_admin }) = command.into_confirmed() else {
            return Ok(CommandOutcome::Cancelled);
        };

        employee.check()?;
        self.departments.ensure(employee.department.trim())?;
        PasswordService::check_policy(&password)?;

        self.identity.create_account(&employee.email, &password).await?;
        let created = self.employees.create(&employee.into_employee(is_admin)).await?;

        self.audit
            .record(Some(session.account_id), AuditAction::EmployeeCreated, AuditStatus::Success, ip)
            .await;
        info!("Employee {} created by admin", created.id);
        Ok(CommandOutcome::Applied(created))
    }

    pub async fn set_employee_active(
        &self,
        session: &SessionContext,
        command: Confirmed<SetEmployeeActive>,
        ip: Option<String>,
    ) -> Result<CommandOutcome<Employee>, DomainError> {
        Self::ensure_admin(session)?;
        let Some(SetEmployeeActive { employee_id, active }) = command.into_confirmed() else {
            return Ok(CommandOutcome::Cancelled);
        };

        let updated = self.employees.set_active(&employee_id, active).await?;
        let action = if active {
            AuditAction::EmployeeActivated
        } else {
            AuditAction::EmployeeBlocked
        };
        self.audit
            .record(Some(session.account_id), action, AuditStatus::Success, ip)
            .await;
        info!("Employee {} {}", employee_id, action.as_str());
        Ok(CommandOutcome::Applied(updated))
    }

    /// Blocks the employee; removes the record only when hard delete is on.
    pub async fn delete_employee(
        &self,
        session: &SessionContext,
        command: Confirmed<DeleteEmployee>,
        ip: Option<String>,
    ) -> Result<CommandOutcome<()>, DomainError> {
        Self::ensure_admin(session)?;
        let Some(DeleteEmployee { employee_id }) = command.into_confirmed() else {
            return Ok(CommandOutcome::Cancelled);
        };

        if self.hard_delete {
            self.employees.delete(&employee_id).await?;
            self.audit
                .record(Some(session.account_id), AuditAction::EmployeeDeleted, AuditStatus::Success, ip)
                .await;
            info!("Employee {} deleted", employee_id);
        } else {
            self.employees.set_active(&employee_id, false).await?;
            self.audit
                .record(Some(session.account_id), AuditAction::EmployeeBlocked, AuditStatus::Success, ip)
                .await;
            info!("Employee {} blocked in place of deletion", employee_id);
        }
        Ok(CommandOutcome::Applied(()))
    }

    /// Sets a new password and closes every pending request for the email.
    /// Returns how many requests were closed.
    pub async fn fulfil_reset(
        &self,
        session: &SessionContext,
        command: Confirmed<FulfilResetRequest>,
        ip: Option<String>,
    ) -> Result<CommandOutcome<u64>, DomainError> {
        Self::ensure_admin(session)?;
        let Some(FulfilResetRequest { email, new_password }) = command.into_confirmed() else {
            return Ok(CommandOutcome::Cancelled);
        };
        let email = normalize_email(&email);

        PasswordService::check_policy(&new_password)?;
        let account = self
            .identity
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        self.identity.update_password(&account.id, &new_password).await?;
        let closed = self.reset_requests.mark_fulfilled_by_email(&email).await?;

        self.audit
            .record(Some(session.account_id), AuditAction::ResetFulfilled, AuditStatus::Success, ip)
            .await;
        info!("Password reset for {} ({} requests closed)", mask_email(&email), closed);
        Ok(CommandOutcome::Applied(closed))
    }
}
