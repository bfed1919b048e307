// ============================================================================
// Portal API - Admin Console Handlers
// File: crates/portal-api/src/handlers/admin.rs
// ============================================================================
//! Admin-only views and commands. Authorization is enforced by the service;
//! mutating routes need `"confirm": true` in the body (or `?confirm=true`
//! for DELETE), otherwise they answer with a cancelled outcome.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use chrono::NaiveDate;
use portal_core::services::{CreateEmployee, DeleteEmployee, FulfilResetRequest, SetEmployeeActive};
use portal_core::{
    Account, AuditLogEntry, CommandOutcome, Confirmed, Employee, Message, MessageFilter, MessageType, ResetRequest,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{ClientIp, CurrentSession};
use crate::handlers::attachment;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Console filters as sent by the browser. Empty values mean "any".
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    pub department: Option<String>,
    pub date: Option<String>,
}

impl MessageQuery {
    pub fn into_filter(self) -> Result<MessageFilter, ApiError> {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let message_type = non_empty(self.message_type)
            .map(|t| {
                MessageType::from_str(&t).ok_or_else(|| ApiError::BadRequest(format!("unknown message type '{}'", t)))
            })
            .transpose()?;
        let date = non_empty(self.date)
            .map(|d| {
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .map_err(|_| ApiError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", d)))
            })
            .transpose()?;

        Ok(MessageFilter {
            message_type,
            department: non_empty(self.department),
            date,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmPayload {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(flatten)]
    pub command: CreateEmployee,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct FulfilResetPayload {
    #[serde(flatten)]
    pub command: FulfilResetRequest,
    #[serde(default)]
    pub confirm: bool,
}

/// GET /api/v1/admin/messages
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<MessageQuery>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let filter = query.into_filter()?;
    let messages = state.admin.list_messages(&session, &filter).await?;
    Ok(Json(ApiResponse::success(messages)))
}

/// GET /api/v1/admin/messages/export
pub async fn export_messages(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
) -> Result<Response, ApiError> {
    let file = state.admin.export_messages(&session, ip).await?;
    Ok(attachment(&file.filename, file.content_type, file.bytes))
}

/// GET /api/v1/admin/logs
pub async fn list_logs(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ApiResponse<Vec<AuditLogEntry>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.admin.list_logs(&session).await?)))
}

/// GET /api/v1/admin/logs/export
pub async fn export_logs(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
) -> Result<Response, ApiError> {
    let file = state.admin.export_logs(&session, ip).await?;
    Ok(attachment(&file.filename, file.content_type, file.bytes))
}

/// GET /api/v1/admin/employees
pub async fn list_employees(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ApiResponse<Vec<Employee>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.admin.list_employees(&session).await?)))
}

/// POST /api/v1/admin/employees
pub async fn create_employee(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommandOutcome<Employee>>>), ApiError> {
    let outcome = state
        .admin
        .create_employee(&session, Confirmed::new(payload.command, payload.confirm), ip)
        .await?;
    let status = if outcome.is_applied() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ApiResponse::success(outcome))))
}

async fn set_active(
    state: AppState,
    session: portal_security::SessionContext,
    employee_id: Uuid,
    active: bool,
    confirm: bool,
    ip: Option<String>,
) -> Result<Json<ApiResponse<CommandOutcome<Employee>>>, ApiError> {
    let outcome = state
        .admin
        .set_employee_active(&session, Confirmed::new(SetEmployeeActive { employee_id, active }, confirm), ip)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// POST /api/v1/admin/employees/{id}/block
pub async fn block_employee(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmPayload>,
) -> Result<Json<ApiResponse<CommandOutcome<Employee>>>, ApiError> {
    set_active(state, session, id, false, payload.confirm, ip).await
}

/// POST /api/v1/admin/employees/{id}/activate
pub async fn activate_employee(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConfirmPayload>,
) -> Result<Json<ApiResponse<CommandOutcome<Employee>>>, ApiError> {
    set_active(state, session, id, true, payload.confirm, ip).await
}

/// DELETE /api/v1/admin/employees/{id}?confirm=true
pub async fn delete_employee(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
    Path(id): Path<Uuid>,
    Query(query): Query<ConfirmPayload>,
) -> Result<Json<ApiResponse<CommandOutcome<()>>>, ApiError> {
    let outcome = state
        .admin
        .delete_employee(&session, Confirmed::new(DeleteEmployee { employee_id: id }, query.confirm), ip)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}

/// GET /api/v1/admin/accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ApiResponse<Vec<Account>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.admin.list_accounts(&session).await?)))
}

/// GET /api/v1/admin/reset-requests
pub async fn list_reset_requests(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ApiResponse<Vec<ResetRequest>>>, ApiError> {
    Ok(Json(ApiResponse::success(state.admin.list_pending_resets(&session).await?)))
}

/// POST /api/v1/admin/reset-requests/fulfill
pub async fn fulfil_reset_request(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
    Json(payload): Json<FulfilResetPayload>,
) -> Result<Json<ApiResponse<CommandOutcome<u64>>>, ApiError> {
    let outcome = state
        .admin
        .fulfil_reset(&session, Confirmed::new(payload.command, payload.confirm), ip)
        .await?;
    Ok(Json(ApiResponse::success(outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(t: &str, d: &str, date: &str) -> MessageQuery {
        MessageQuery {
            message_type: Some(t.into()),
            department: Some(d.into()),
            date: Some(date.into()),
        }
    }

    #[test]
    fn test_empty_values_mean_any() {
        let filter = query("", "  ", "").into_filter().unwrap();
        assert!(filter.message_type.is_none());
        assert!(filter.department.is_none());
        assert!(filter.date.is_none());
    }

    #[test]
    fn test_filter_values_parsed() {
        let filter = query("complaint", "TI", "2024-03-07").into_filter().unwrap();
        assert_eq!(filter.message_type, Some(MessageType::Complaint));
        assert_eq!(filter.department.as_deref(), Some("TI"));
        assert_eq!(filter.date, NaiveDate::from_ymd_opt(2024, 3, 7));
    }

    #[test]
    fn test_bad_filter_values_rejected() {
        assert!(matches!(
            query("rant", "", "").into_filter(),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            query("", "", "07/03/2024").into_filter(),
            Err(ApiError::BadRequest(_))
        ));
    }
}
