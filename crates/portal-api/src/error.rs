//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portal_core::DomainError;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl ApiError {
    /// Status and machine-readable code for the response envelope.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Domain(e) => match e {
                DomainError::EmployeeNotFound => (StatusCode::NOT_FOUND, "EMPLOYEE_NOT_FOUND"),
                DomainError::EmployeeNotRegistered(_) => (StatusCode::NOT_FOUND, "EMPLOYEE_NOT_REGISTERED"),
                DomainError::AccountNotFound => (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND"),
                DomainError::MessageNotFound => (StatusCode::NOT_FOUND, "MESSAGE_NOT_FOUND"),
                DomainError::ResetRequestNotFound(_) => (StatusCode::NOT_FOUND, "RESET_REQUEST_NOT_FOUND"),
                DomainError::UserNotActive => (StatusCode::FORBIDDEN, "USER_NOT_ACTIVE"),
                DomainError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
                DomainError::EmailAlreadyExists(_) => (StatusCode::CONFLICT, "EMAIL_ALREADY_EXISTS"),
                DomainError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
                DomainError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                DomainError::UnknownDepartment(_) => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_DEPARTMENT"),
                DomainError::ValidationError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
                DomainError::PasswordHashError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PASSWORD_HASH_ERROR"),
                DomainError::TokenGenerationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TOKEN_ERROR"),
                DomainError::ExportError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR"),
                DomainError::DatabaseError(_) => (StatusCode::SERVICE_UNAVAILABLE, "DATABASE_ERROR"),
                DomainError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            },
        }
    }

    pub fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        self.log(status);
        let body = Json(ApiResponse::<()>::error(code, &self.to_string()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_miss_maps_to_not_found() {
        let err = ApiError::from(DomainError::EmployeeNotRegistered("ana@x.com".into()));
        assert_eq!(err.status_and_code(), (StatusCode::NOT_FOUND, "EMPLOYEE_NOT_REGISTERED"));
    }

    #[test]
    fn test_store_failure_is_retryable_status() {
        let err = ApiError::from(DomainError::DatabaseError("timeout".into()));
        assert_eq!(err.status_and_code().0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Database error: timeout");
    }
}
