// ============================================================================
// Portal Core - Authentication Service
// File: crates/portal-core/src/services/auth_service.rs
// ============================================================================
//! Sign-in, sign-out, self-registration and session resolution

use std::sync::Arc;

use email_address::EmailAddress;
use portal_security::{JwtService, PasswordService, SessionContext, SessionStore};
use portal_shared::utils::{mask_email, normalize_email};
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{AuditAction, AuditStatus, DepartmentCatalogue, Employee, NewEmployee, ResetRequest};
use crate::error::DomainError;
use crate::repositories::{EmployeeRepository, IdentityProvider, ResetRequestRepository};
use crate::services::audit::AuditTrail;

/// Authentication service for handling sign-in/registration flows
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    employees: Arc<dyn EmployeeRepository>,
    reset_requests: Arc<dyn ResetRequestRepository>,
    sessions: Arc<SessionStore>,
    jwt: JwtService,
    session_ttl_seconds: i64,
    audit: AuditTrail,
    departments: DepartmentCatalogue,
}

/// Result of successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub session: SessionContext,
    pub access_token: String,
    /// `None` when the account has no directory record yet.
    pub employee: Option<Employee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    #[serde(flatten)]
    pub employee: NewEmployee,
    pub password: String,
}

impl AuthService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        employees: Arc<dyn EmployeeRepository>,
        reset_requests: Arc<dyn ResetRequestRepository>,
        sessions: Arc<SessionStore>,
        jwt: JwtService,
        session_ttl_seconds: i64,
        audit: AuditTrail,
        departments: DepartmentCatalogue,
    ) -> Self {
        Self {
            identity,
            employees,
            reset_requests,
            sessions,
            jwt,
            session_ttl_seconds,
            audit,
            departments,
        }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str, ip: Option<String>) -> Result<LoginResult, DomainError> {
        let email = normalize_email(email);
        info!("Login attempt for email: {}", mask_email(&email));

        if !EmailAddress::is_valid(&email) || password.is_empty() {
            return Err(DomainError::ValidationError(
                "Email and password are required".into(),
            ));
        }

        // 1. Verify credentials with the identity provider
        let account = match self.identity.sign_in(&email, password).await {
            Ok(account) => account,
            Err(e) => {
                warn!("Login failed for {}: {}", mask_email(&email), e);
                self.audit
                    .record(None, AuditAction::Login, AuditStatus::Failure, ip)
                    .await;
                return Err(e);
            }
        };

        // 2. Blocked employees cannot sign in; a missing record is allowed and
        //    surfaces later as the registration lookup-miss.
        let employee = self.employees.find_by_email(&account.email).await?;
        if let Some(e) = &employee {
            if !e.active {
                warn!("Login refused: employee {} is blocked", e.id);
                self.audit
                    .record(Some(account.id), AuditAction::Login, AuditStatus::Failure, ip)
                    .await;
                return Err(DomainError::UserNotActive);
            }
        }

        // 3. Open the session and issue its token
        let is_admin = employee.as_ref().map(|e| e.is_admin).unwrap_or(false);
        let session = SessionContext::new(account.id, account.email.clone(), is_admin, self.session_ttl_seconds);
        let access_token = self
            .jwt
            .generate_access_token(&account.id, &session.session_id)
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;
        self.sessions.insert(session.clone());

        self.audit
            .record(Some(account.id), AuditAction::Login, AuditStatus::Success, ip)
            .await;
        info!("Login successful for: {}", mask_email(&email));

        Ok(LoginResult {
            session,
            access_token,
            employee,
        })
    }

    pub async fn logout(&self, session: &SessionContext, ip: Option<String>) {
        self.sessions.remove(&session.session_id);
        self.audit
            .record(Some(session.account_id), AuditAction::Logout, AuditStatus::Success, ip)
            .await;
        info!("Logout for: {}", mask_email(&session.email));
    }

    /// Resolves a bearer token to its live session.
    pub fn authenticate(&self, token: &str) -> Result<SessionContext, DomainError> {
        let claims = self
            .jwt
            .validate_token(token)
            .map_err(|e| DomainError::Unauthorized(e.to_string()))?;
        let session_id = Uuid::parse_str(&claims.sid)
            .map_err(|_| DomainError::Unauthorized("malformed session id".into()))?;
        self.sessions
            .get(&session_id)
            .ok_or_else(|| DomainError::Unauthorized("session expired or signed out".into()))
    }

    /// Directory record for the signed-in person, if registration completed.
    pub async fn profile(&self, session: &SessionContext) -> Result<Option<Employee>, DomainError> {
        self.employees.find_by_email(&session.email).await
    }

    /// Creates the identity account, then the directory record.
    pub async fn register(&self, registration: Registration, ip: Option<String>) -> Result<Employee, DomainError> {
        let Registration { employee: input, password } = registration;
        info!("Registration attempt for email: {}", mask_email(&input.email));

        input.check()?;
        self.departments.ensure(input.department.trim())?;
        PasswordService::check_policy(&password)?;

        let account = self.identity.create_account(&input.email, &password).await?;

        let employee = input.into_employee(false);
        let created = self.employees.create(&employee).await.map_err(|e| {
            error!("Account {} created but directory insert failed: {}", account.id, e);
            match e {
                DomainError::DatabaseError(msg) => {
                    DomainError::DatabaseError(format!("Failed to save employee data: {}", msg))
                }
                other => other,
            }
        })?;

        self.audit
            .record(Some(account.id), AuditAction::Register, AuditStatus::Success, ip)
            .await;
        info!("Registration successful for: {}", mask_email(&created.email));
        Ok(created)
    }

    /// Files a password reset request for the employee owning `email`.
    pub async fn request_password_reset(&self, email: &str, ip: Option<String>) -> Result<ResetRequest, DomainError> {
        let employee = self
            .employees
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::EmployeeNotRegistered(normalize_email(email)))?;

        let request = self
            .reset_requests
            .create(&ResetRequest::new(employee.id, &employee.email))
            .await?;

        self.audit
            .record(None, AuditAction::ResetRequested, AuditStatus::Success, ip)
            .await;
        info!("Password reset requested for: {}", mask_email(&request.user_email));
        Ok(request)
    }

    /// Makes sure the configured administrator can sign in. Existing
    /// accounts and records are left untouched.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        department: &str,
    ) -> Result<(), DomainError> {
        if self.identity.find_by_email(email).await?.is_none() {
            self.identity.create_account(email, password).await?;
            info!("Bootstrap admin account created: {}", mask_email(email));
        }

        if self.employees.find_by_email(email).await?.is_none() {
            let employee = NewEmployee {
                full_name: full_name.to_string(),
                national_id: "000.000.000-00".to_string(),
                department: department.to_string(),
                phone: None,
                email: email.to_string(),
            }
            .into_employee(true);
            self.employees.create(&employee).await?;
            info!("Bootstrap admin directory record created: {}", employee.id);
        }
        Ok(())
    }
}
