use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use portal_core::domain::{Account, AuditLogEntry, Employee, Message, ResetRequest};
use portal_core::error::DomainError;
use portal_core::repositories::{
    AuditLogRepository, EmployeeRepository, IdentityProvider, MessageRepository, ResetRequestRepository,
};
use portal_security::PasswordService;
use portal_shared::utils::normalize_email;

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees: RwLock<Vec<Employee>>,
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn list(&self) -> Result<Vec<Employee>, DomainError> {
        let mut employees = self.employees.read().await.clone();
        employees.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(employees)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Employee>, DomainError> {
        Ok(self.employees.read().await.iter().find(|e| &e.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DomainError> {
        Ok(self
            .employees
            .read()
            .await
            .iter()
            .find(|e| e.matches_email(email))
            .cloned())
    }

    async fn create(&self, employee: &Employee) -> Result<Employee, DomainError> {
        let mut employees = self.employees.write().await;
        if employees.iter().any(|e| e.matches_email(&employee.email)) {
            return Err(DomainError::DatabaseError(format!(
                "duplicate directory email {}",
                employee.email
            )));
        }
        employees.push(employee.clone());
        Ok(employee.clone())
    }

    async fn set_active(&self, id: &Uuid, active: bool) -> Result<Employee, DomainError> {
        let mut employees = self.employees.write().await;
        let employee = employees
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or(DomainError::EmployeeNotFound)?;
        if active {
            employee.activate();
        } else {
            employee.block();
        }
        Ok(employee.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let mut employees = self.employees.write().await;
        let before = employees.len();
        employees.retain(|e| &e.id != id);
        if employees.len() == before {
            return Err(DomainError::EmployeeNotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, DomainError> {
        self.messages.write().await.push(message.clone());
        Ok(message.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, DomainError> {
        Ok(self.messages.read().await.iter().find(|m| &m.id == id).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Message>, DomainError> {
        let mut messages = self.messages.read().await.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .filter(|m| m.created_at >= start && m.created_at < end)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryAuditLogRepository {
    entries: RwLock<Vec<AuditLogEntry>>,
}

#[async_trait]
impl AuditLogRepository for InMemoryAuditLogRepository {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<AuditLogEntry>, DomainError> {
        let mut entries = self.entries.read().await.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }
}

#[derive(Default)]
pub struct InMemoryResetRequestRepository {
    requests: RwLock<Vec<ResetRequest>>,
}

#[async_trait]
impl ResetRequestRepository for InMemoryResetRequestRepository {
    async fn create(&self, request: &ResetRequest) -> Result<ResetRequest, DomainError> {
        self.requests.write().await.push(request.clone());
        Ok(request.clone())
    }

    async fn list_pending(&self) -> Result<Vec<ResetRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .filter(|r| !r.fulfilled)
            .cloned()
            .collect())
    }

    async fn mark_fulfilled_by_email(&self, email: &str) -> Result<u64, DomainError> {
        let email = normalize_email(email);
        let mut closed = 0;
        for request in self.requests.write().await.iter_mut() {
            if !request.fulfilled && normalize_email(&request.user_email) == email {
                request.fulfilled = true;
                closed += 1;
            }
        }
        Ok(closed)
    }
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<Vec<Account>>,
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, DomainError> {
        let email = normalize_email(email);
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.email == email)
            .ok_or(DomainError::InvalidCredentials)?;

        if !PasswordService::verify(password, &account.password_hash)? {
            warn!("Password mismatch for account {}", account.id);
            return Err(DomainError::InvalidCredentials);
        }
        account.last_sign_in_at = Some(Utc::now());
        Ok(account.clone())
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Account, DomainError> {
        let account = Account::new(email, PasswordService::hash(password)?);
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(DomainError::EmailAlreadyExists(account.email));
        }
        accounts.push(account.clone());
        Ok(account)
    }

    async fn update_password(&self, id: &Uuid, password: &str) -> Result<(), DomainError> {
        let hash = PasswordService::hash(password)?;
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| &a.id == id)
            .ok_or(DomainError::AccountNotFound)?;
        account.password_hash = hash;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let email = normalize_email(email);
        Ok(self.accounts.read().await.iter().find(|a| a.email == email).cloned())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, DomainError> {
        let mut accounts = self.accounts.read().await.clone();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(accounts)
    }
}
