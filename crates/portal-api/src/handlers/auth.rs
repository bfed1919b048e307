// ============================================================================
// Portal API - Auth Handlers
// File: crates/portal-api/src/handlers/auth.rs
// ============================================================================
//! Sign-in, sign-out, registration and password reset requests

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use portal_core::services::Registration;
use portal_core::Employee;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::{ClientIp, CurrentSession};
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub account_id: String,
    pub email: String,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub session: SessionDto,
    /// `None` until the directory record exists.
    pub employee: Option<Employee>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub session: SessionDto,
    pub employee: Option<Employee>,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequestPayload {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ResetRequestResponse {
    pub request_id: String,
    pub message: &'static str,
}

fn session_dto(session: &portal_security::SessionContext) -> SessionDto {
    SessionDto {
        account_id: session.account_id.to_string(),
        email: session.email.clone(),
        is_admin: session.is_admin,
        expires_at: session.expires_at,
    }
}

/// Login handler - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required".into()));
    }

    let result = state.auth.login(&payload.email, &payload.password, ip).await?;
    Ok(Json(ApiResponse::success(LoginResponse {
        access_token: result.access_token,
        token_type: "Bearer",
        session: session_dto(&result.session),
        employee: result.employee,
    })))
}

/// Register handler - POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<Registration>,
) -> Result<(StatusCode, Json<ApiResponse<Employee>>), ApiError> {
    let employee = state.auth.register(payload, ip).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(employee))))
}

/// Logout handler - POST /api/v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
) -> Json<ApiResponse<()>> {
    state.auth.logout(&session, ip).await;
    Json(ApiResponse::success(()))
}

/// Profile handler - GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let employee = state.auth.profile(&session).await?;
    Ok(Json(ApiResponse::success(ProfileResponse {
        session: session_dto(&session),
        employee,
    })))
}

/// Password reset request - POST /api/v1/auth/reset-requests
pub async fn request_password_reset(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Json(payload): Json<ResetRequestPayload>,
) -> Result<(StatusCode, Json<ApiResponse<ResetRequestResponse>>), ApiError> {
    let request = state.auth.request_password_reset(&payload.email, ip).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ResetRequestResponse {
            request_id: request.id.to_string(),
            message: "Request recorded. An administrator will set a new password.",
        })),
    ))
}
