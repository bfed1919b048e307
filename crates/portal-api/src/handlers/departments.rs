use axum::{extract::State, Json};

use crate::response::ApiResponse;
use crate::state::AppState;

/// Department list - GET /api/v1/departments
pub async fn list_departments(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::success(state.departments.names().to_vec()))
}
