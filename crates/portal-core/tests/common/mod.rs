//! Hand-written stores shared by the integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::repositories::{AuditLogRepository, EmployeeRepository, MessageRepository};
use portal_core::{AuditLogEntry, DomainError, Employee, Message};
use portal_security::SessionContext;
use tokio::sync::Barrier;
use uuid::Uuid;

pub fn employee(email: &str) -> Employee {
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

pub fn session(email: &str) -> SessionContext {
    SessionContext::new(Uuid::new_v4(), email.into(), false, 3600)
}

#[derive(Default)]
pub struct Directory {
    pub employees: Mutex<Vec<Employee>>,
    pub writes: Mutex<usize>,
}

impl Directory {
    pub fn with(employees: Vec<Employee>) -> Self {
        Self {
            employees: Mutex::new(employees),
            writes: Mutex::new(0),
        }
    }
}

#[async_trait]
impl EmployeeRepository for Directory {
    async fn list(&self) -> Result<Vec<Employee>, DomainError> {
        Ok(self.employees.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Employee>, DomainError> {
        Ok(self.employees.lock().unwrap().iter().find(|e| &e.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, DomainError> {
        Ok(self
            .employees
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.matches_email(email))
            .cloned())
    }

    async fn create(&self, employee: &Employee) -> Result<Employee, DomainError> {
        *self.writes.lock().unwrap() += 1;
        self.employees.lock().unwrap().push(employee.clone());
        Ok(employee.clone())
    }

    async fn set_active(&self, id: &Uuid, active: bool) -> Result<Employee, DomainError> {
        *self.writes.lock().unwrap() += 1;
        let mut employees = self.employees.lock().unwrap();
        let employee = employees
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or(DomainError::EmployeeNotFound)?;
        employee.active = active;
        Ok(employee.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        *self.writes.lock().unwrap() += 1;
        self.employees.lock().unwrap().retain(|e| &e.id != id);
        Ok(())
    }
}

/// Message store whose day count starts at `base` and, when a barrier is
/// set, holds every count until all callers have read it.
pub struct MessageLedger {
    pub base: u64,
    pub saved: Mutex<Vec<Message>>,
    pub barrier: Option<Barrier>,
    pub fail_inserts: bool,
}

impl MessageLedger {
    pub fn new(base: u64) -> Self {
        Self {
            base,
            saved: Mutex::new(Vec::new()),
            barrier: None,
            fail_inserts: false,
        }
    }

    pub fn with_barrier(base: u64, parties: usize) -> Self {
        Self {
            barrier: Some(Barrier::new(parties)),
            ..Self::new(base)
        }
    }
}

#[async_trait]
impl MessageRepository for MessageLedger {
    async fn create(&self, message: &Message) -> Result<Message, DomainError> {
        if self.fail_inserts {
            return Err(DomainError::DatabaseError("insert rejected".into()));
        }
        self.saved.lock().unwrap().push(message.clone());
        Ok(message.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, DomainError> {
        Ok(self.saved.lock().unwrap().iter().find(|m| &m.id == id).cloned())
    }

    async fn list_recent(&self) -> Result<Vec<Message>, DomainError> {
        let mut messages = self.saved.lock().unwrap().clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(messages)
    }

    async fn count_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let count = self.base
            + self
                .saved
                .lock()
                .unwrap()
                .iter()
                .filter(|m| m.created_at >= start && m.created_at < end)
                .count() as u64;
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        Ok(count)
    }
}

#[derive(Default)]
pub struct AuditSink {
    pub entries: Mutex<Vec<AuditLogEntry>>,
}

#[async_trait]
impl AuditLogRepository for AuditSink {
    async fn append(&self, entry: &AuditLogEntry) -> Result<(), DomainError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<AuditLogEntry>, DomainError> {
        let mut entries = self.entries.lock().unwrap().clone();
        entries.reverse();
        Ok(entries)
    }
}
