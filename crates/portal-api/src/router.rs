//! Route table

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{admin, auth, departments, health, messages};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/reset-requests", post(auth::request_password_reset))
        .route("/api/v1/departments", get(departments::list_departments));

    let session_routes = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))
        .route("/api/v1/messages", post(messages::submit_message))
        .route("/api/v1/messages/{id}/receipt", get(messages::download_receipt));

    let admin_routes = Router::new()
        .route("/api/v1/admin/messages", get(admin::list_messages))
        .route("/api/v1/admin/messages/export", get(admin::export_messages))
        .route("/api/v1/admin/logs", get(admin::list_logs))
        .route("/api/v1/admin/logs/export", get(admin::export_logs))
        .route(
            "/api/v1/admin/employees",
            get(admin::list_employees).post(admin::create_employee),
        )
        .route("/api/v1/admin/employees/{id}", delete(admin::delete_employee))
        .route("/api/v1/admin/employees/{id}/block", post(admin::block_employee))
        .route("/api/v1/admin/employees/{id}/activate", post(admin::activate_employee))
        .route("/api/v1/admin/accounts", get(admin::list_accounts))
        .route("/api/v1/admin/reset-requests", get(admin::list_reset_requests))
        .route("/api/v1/admin/reset-requests/fulfill", post(admin::fulfil_reset_request));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default().include_headers(false)))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
