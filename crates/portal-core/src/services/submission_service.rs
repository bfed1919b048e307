// ============================================================================
// Portal Core - Submission Service
// File: crates/portal-core/src/services/submission_service.rs
// ============================================================================
//! Message submission: resolve the sender, stamp the draft, persist it and
//! hand back the receipt.

use std::sync::Arc;

use chrono::Utc;
use portal_security::SessionContext;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::domain::{AuditAction, AuditStatus, DepartmentCatalogue, Employee, Message, MessageDraft};
use crate::error::DomainError;
use crate::repositories::{EmployeeRepository, MessageRepository};
use crate::services::audit::AuditTrail;
use crate::services::protocol::ProtocolGenerator;
use crate::services::receipt::{build_receipt, Receipt};

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: Message,
    pub receipt: Receipt,
}

/// A submission that did not reach the store. The draft comes back exactly
/// as it was handed in.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct SubmitFailure {
    pub draft: MessageDraft,
    pub error: DomainError,
}

pub struct SubmissionService {
    employees: Arc<dyn EmployeeRepository>,
    messages: Arc<dyn MessageRepository>,
    generator: ProtocolGenerator,
    audit: AuditTrail,
    departments: DepartmentCatalogue,
}

impl SubmissionService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        messages: Arc<dyn MessageRepository>,
        generator: ProtocolGenerator,
        audit: AuditTrail,
        departments: DepartmentCatalogue,
    ) -> Self {
        Self {
            employees,
            messages,
            generator,
            audit,
            departments,
        }
    }

    /// Directory record behind the session. A miss means the person has an
    /// account but never completed registration.
    pub async fn resolve_employee(&self, session: &SessionContext) -> Result<Employee, DomainError> {
        let employee = self
            .employees
            .find_by_email(&session.email)
            .await?
            .ok_or_else(|| {
                warn!(
                    "No directory record for {}",
                    portal_shared::utils::mask_email(&session.email)
                );
                DomainError::EmployeeNotRegistered(session.email.clone())
            })?;

        if !employee.active {
            return Err(DomainError::UserNotActive);
        }
        Ok(employee)
    }

    pub async fn submit(
        &self,
        session: &SessionContext,
        draft: MessageDraft,
        ip: Option<String>,
    ) -> Result<SentMessage, SubmitFailure> {
        if let Err(e) = draft.validate() {
            return Err(SubmitFailure { draft, error: e.into() });
        }
        if let Err(error) = self.departments.ensure(&draft.target_department) {
            return Err(SubmitFailure { draft, error });
        }

        let employee = match self.resolve_employee(session).await {
            Ok(employee) => employee,
            Err(error) => return Err(SubmitFailure { draft, error }),
        };

        self.audit
            .record(Some(session.account_id), AuditAction::SentMessage, AuditStatus::Success, ip)
            .await;

        let now = Utc::now();
        let stamp = match self.generator.stamp(now, &draft.body).await {
            Ok(stamp) => stamp,
            Err(error) => return Err(SubmitFailure { draft, error }),
        };

        let message = Message::seal(draft.clone(), &employee, &session.email, stamp, now);
        let saved = match self.messages.create(&message).await {
            Ok(saved) => saved,
            Err(error) => {
                warn!("Message insert failed, submission stays draft: {}", error);
                return Err(SubmitFailure { draft, error });
            }
        };

        info!(
            "Message {} sent to {} with protocol {}",
            saved.id, saved.target_department, saved.protocol
        );

        let receipt = build_receipt(
            &employee,
            &saved,
            &saved.target_department,
            &saved.protocol,
            &saved.content_hash,
            Utc::now(),
        );
        Ok(SentMessage { message: saved, receipt })
    }

    /// Regenerates the receipt of a sent message. Senders see their own
    /// messages only; admins see all.
    pub async fn receipt_for(&self, session: &SessionContext, message_id: &Uuid) -> Result<Receipt, DomainError> {
        let message = self
            .messages
            .find_by_id(message_id)
            .await?
            .ok_or(DomainError::MessageNotFound)?;

        let is_sender = portal_shared::utils::normalize_email(&message.sender_email)
            == portal_shared::utils::normalize_email(&session.email);
        if !session.is_admin && !is_sender {
            return Err(DomainError::Forbidden("receipt belongs to another employee".into()));
        }

        let employee = match self.employees.find_by_email(&message.sender_email).await? {
            Some(employee) => employee,
            None => sender_snapshot(&message),
        };

        Ok(build_receipt(
            &employee,
            &message,
            &message.target_department,
            &message.protocol,
            &message.content_hash,
            Utc::now(),
        ))
    }
}

/// Stand-in sender built from the copy stored on the message, used when the
/// directory record no longer exists.
fn sender_snapshot(message: &Message) -> Employee {
    Employee {
        id: Uuid::nil(),
        full_name: message.sender_name.clone(),
        national_id: message.sender_national_id.clone(),
        department: message.sender_department.clone(),
        phone: String::new(),
        email: message.sender_email.clone(),
        is_admin: false,
        active: false,
        created_at: message.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageType, SubmissionState};
    use crate::repositories::audit_log_repository::MockAuditLogRepository;
    use crate::repositories::employee_repository::MockEmployeeRepository;
    use crate::repositories::message_repository::MockMessageRepository;
    use crate::services::protocol::CountingSequencer;

    fn employee(email: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            full_name: "Ana Souza".into(),
            national_id: "123.456.789-09".into(),
            department: "Estoque".into(),
            phone: String::new(),
            email: email.into(),
            is_admin: false,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn session(email: &str) -> SessionContext {
        SessionContext::new(Uuid::new_v4(), email.into(), false, 3600)
    }

    fn draft() -> MessageDraft {
        MessageDraft {
            message_type: MessageType::Complaint,
            target_department: "TI".into(),
            body: "The VPN drops every hour".into(),
        }
    }

    fn service(
        employees: MockEmployeeRepository,
        messages: MockMessageRepository,
        logs: MockAuditLogRepository,
    ) -> SubmissionService {
        let messages: Arc<dyn MessageRepository> = Arc::new(messages);
        let generator = ProtocolGenerator::new(Arc::new(CountingSequencer::new(messages.clone())));
        SubmissionService::new(
            Arc::new(employees),
            messages,
            generator,
            AuditTrail::new(Arc::new(logs)),
            DepartmentCatalogue::default(),
        )
    }

    #[tokio::test]
    async fn test_submit_moves_draft_to_sent() {
        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_email()
            .returning(|email| Ok(Some(employee(email))));

        let mut messages = MockMessageRepository::new();
        messages.expect_count_created_between().returning(|_, _| Ok(0));
        messages
            .expect_create()
            .times(1)
            .returning(|m| Ok(m.clone()));

        let mut logs = MockAuditLogRepository::new();
        logs.expect_append().times(1).returning(|_| Ok(()));

        let svc = service(employees, messages, logs);
        let state = SubmissionState::Draft(draft());
        assert!(!state.is_sent());

        let SubmissionState::Draft(form) = state else { unreachable!() };
        let sent = svc.submit(&session("ana@x.com"), form, None).await.unwrap();
        let state = SubmissionState::Sent(sent.message.clone());

        assert!(state.is_sent());
        assert!(state.protocol().unwrap().ends_with("-0001"));
        assert_eq!(state.content_hash().unwrap().len(), 64);
        assert_eq!(sent.receipt.protocol, sent.message.protocol);
        assert_eq!(sent.receipt.origin_department, "Estoque");
        assert_eq!(sent.receipt.destination_department, "TI");
        assert_eq!(sent.message.sender_email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_store_failure_keeps_draft_and_message_verbatim() {
        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_email()
            .returning(|email| Ok(Some(employee(email))));

        let mut messages = MockMessageRepository::new();
        messages.expect_count_created_between().returning(|_, _| Ok(3));
        messages
            .expect_create()
            .returning(|_| Err(DomainError::DatabaseError("new row violates row-level security policy".into())));

        let mut logs = MockAuditLogRepository::new();
        logs.expect_append().returning(|_| Ok(()));

        let svc = service(employees, messages, logs);
        let failure = svc.submit(&session("ana@x.com"), draft(), None).await.unwrap_err();

        assert_eq!(failure.draft, draft());
        assert_eq!(
            failure.error.to_string(),
            "Database error: new row violates row-level security policy"
        );
        let state = SubmissionState::Draft(failure.draft);
        assert_eq!(state.protocol(), None);
        assert_eq!(state.content_hash(), None);
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_block_submission() {
        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_email()
            .returning(|email| Ok(Some(employee(email))));

        let mut messages = MockMessageRepository::new();
        messages.expect_count_created_between().returning(|_, _| Ok(0));
        messages.expect_create().times(1).returning(|m| Ok(m.clone()));

        let mut logs = MockAuditLogRepository::new();
        logs.expect_append()
            .returning(|_| Err(DomainError::DatabaseError("logs unavailable".into())));

        let svc = service(employees, messages, logs);
        assert!(svc.submit(&session("ana@x.com"), draft(), None).await.is_ok());
    }

    #[tokio::test]
    async fn test_lookup_miss_writes_nothing() {
        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_email().returning(|_| Ok(None));

        let mut messages = MockMessageRepository::new();
        messages.expect_count_created_between().never();
        messages.expect_create().never();

        let mut logs = MockAuditLogRepository::new();
        logs.expect_append().never();

        let svc = service(employees, messages, logs);
        let failure = svc.submit(&session("ana@x.com"), draft(), None).await.unwrap_err();

        assert!(matches!(failure.error, DomainError::EmployeeNotRegistered(ref e) if e == "ana@x.com"));
    }

    #[tokio::test]
    async fn test_validation_blocks_before_any_store_call() {
        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_email().never();
        let mut messages = MockMessageRepository::new();
        messages.expect_create().never();
        let logs = MockAuditLogRepository::new();

        let svc = service(employees, messages, logs);

        let mut empty_body = draft();
        empty_body.body = String::new();
        let failure = svc.submit(&session("ana@x.com"), empty_body, None).await.unwrap_err();
        assert!(matches!(failure.error, DomainError::ValidationError(_)));

        let mut unknown = draft();
        unknown.target_department = "Marketing".into();
        let failure = svc.submit(&session("ana@x.com"), unknown, None).await.unwrap_err();
        assert!(matches!(failure.error, DomainError::UnknownDepartment(_)));
    }

    #[tokio::test]
    async fn test_blocked_employee_cannot_submit() {
        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_email().returning(|email| {
            let mut e = employee(email);
            e.block();
            Ok(Some(e))
        });
        let mut messages = MockMessageRepository::new();
        messages.expect_create().never();
        let logs = MockAuditLogRepository::new();

        let svc = service(employees, messages, logs);
        let failure = svc.submit(&session("ana@x.com"), draft(), None).await.unwrap_err();
        assert!(matches!(failure.error, DomainError::UserNotActive));
    }

    #[tokio::test]
    async fn test_receipt_for_other_sender_is_forbidden() {
        let stored = Message::seal(
            draft(),
            &employee("bob@x.com"),
            "bob@x.com",
            crate::domain::ProtocolStamp {
                protocol: "#20240307-0001".into(),
                content_hash: "0".repeat(64),
            },
            Utc::now(),
        );
        let id = stored.id;

        let employees = MockEmployeeRepository::new();
        let mut messages = MockMessageRepository::new();
        messages
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let logs = MockAuditLogRepository::new();

        let svc = service(employees, messages, logs);
        let result = svc.receipt_for(&session("ana@x.com"), &id).await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_receipt_falls_back_to_message_snapshot() {
        let stored = Message::seal(
            draft(),
            &employee("ana@x.com"),
            "ana@x.com",
            crate::domain::ProtocolStamp {
                protocol: "#20240307-0009".into(),
                content_hash: "0".repeat(64),
            },
            Utc::now(),
        );
        let id = stored.id;

        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_email().returning(|_| Ok(None));
        let mut messages = MockMessageRepository::new();
        messages
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let logs = MockAuditLogRepository::new();

        let svc = service(employees, messages, logs);
        let receipt = svc.receipt_for(&session("ANA@x.com"), &id).await.unwrap();
        assert_eq!(receipt.employee_name, "Ana Souza");
        assert_eq!(receipt.origin_department, "Estoque");
        assert_eq!(receipt.protocol, "#20240307-0009");
    }
}
