//! Domain errors

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Employee not found")]
    EmployeeNotFound,

    #[error("Employee not registered in the internal directory: {0}")]
    EmployeeNotRegistered(String),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Message not found")]
    MessageNotFound,

    #[error("Reset request not found for {0}")]
    ResetRequestNotFound(String),

    #[error("User not active")]
    UserNotActive,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered: {0}. Use the password reset request instead")]
    EmailAlreadyExists(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unknown department: {0}")]
    UnknownDepartment(String),

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Token generation error: {0}")]
    TokenGenerationError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(errors.to_string())
    }
}

impl From<portal_security::password::PasswordError> for DomainError {
    fn from(err: portal_security::password::PasswordError) -> Self {
        use portal_security::password::PasswordError;
        match err {
            PasswordError::HashError(msg) => DomainError::PasswordHashError(msg),
            other => DomainError::ValidationError(other.to_string()),
        }
    }
}
