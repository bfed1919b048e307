// ============================================================================
// Portal API - Message Handlers
// File: crates/portal-api/src/handlers/messages.rs
// ============================================================================

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use portal_core::services::Receipt;
use portal_core::{Message, MessageDraft, SubmissionState};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{ClientIp, CurrentSession};
use crate::handlers::attachment;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SentResponse {
    pub state: &'static str,
    pub message: Message,
    pub receipt: Receipt,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub state: &'static str,
    pub draft: MessageDraft,
}

/// Submit handler - POST /api/v1/messages
///
/// On failure the draft is echoed back untouched so the form can be
/// resubmitted as is.
pub async fn submit_message(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ClientIp(ip): ClientIp,
    Json(draft): Json<MessageDraft>,
) -> Response {
    match state.submissions.submit(&session, draft, ip).await {
        Ok(sent) => {
            let status = SubmissionState::Sent(sent.message.clone()).status();
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(SentResponse {
                    state: status,
                    message: sent.message,
                    receipt: sent.receipt,
                })),
            )
                .into_response()
        }
        Err(failure) => {
            let error = ApiError::from(failure.error);
            let (status, code) = error.status_and_code();
            error.log(status);
            let body = ApiResponse::error_with_data(
                code,
                &error.to_string(),
                DraftResponse {
                    state: SubmissionState::Draft(failure.draft.clone()).status(),
                    draft: failure.draft,
                },
            );
            (status, Json(body)).into_response()
        }
    }
}

/// Receipt download - GET /api/v1/messages/{id}/receipt
pub async fn download_receipt(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let receipt = state.submissions.receipt_for(&session, &id).await?;
    let document = state.receipts.render(&receipt)?;
    Ok(attachment(&document.filename, document.content_type, document.bytes))
}
