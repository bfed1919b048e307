use std::sync::Arc;

use portal_core::services::{AdminService, AuthService, ReceiptRenderer, SubmissionService};
use portal_core::DepartmentCatalogue;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub submissions: Arc<SubmissionService>,
    pub admin: Arc<AdminService>,
    pub receipts: Arc<dyn ReceiptRenderer>,
    pub departments: DepartmentCatalogue,
    /// `None` when running on the in-memory stores.
    pub db: Option<PgPool>,
    /// Honour forwarding headers when resolving the client address.
    pub trust_proxy_headers: bool,
}
