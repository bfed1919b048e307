#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use portal_api::{build_router, AppState};
use portal_core::services::{
    AdminService, AuditTrail, AuthService, CountingSequencer, ProtocolGenerator, SubmissionService,
};
use portal_core::DepartmentCatalogue;
use portal_infrastructure::{
    InMemoryAuditLogRepository, InMemoryEmployeeRepository, InMemoryIdentityProvider, InMemoryMessageRepository,
    InMemoryResetRequestRepository, PdfReceiptRenderer, XlsxExporter,
};
use portal_security::{JwtService, SessionStore};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@portal.test";
pub const ADMIN_PASSWORD: &str = "admin-secret-1";

pub struct TestApp {
    pub router: Router,
    pub auth: Arc<AuthService>,
    pub identity: Arc<InMemoryIdentityProvider>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub logs: Arc<InMemoryAuditLogRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let identity = Arc::new(InMemoryIdentityProvider::default());
        let employees = Arc::new(InMemoryEmployeeRepository::default());
        let messages = Arc::new(InMemoryMessageRepository::default());
        let logs = Arc::new(InMemoryAuditLogRepository::default());
        let resets = Arc::new(InMemoryResetRequestRepository::default());
        let departments = DepartmentCatalogue::default();
        let audit = AuditTrail::new(logs.clone());

        let auth = Arc::new(AuthService::new(
            identity.clone(),
            employees.clone(),
            resets.clone(),
            Arc::new(SessionStore::new()),
            JwtService::new("integration-secret".into(), 3600),
            3600,
            audit.clone(),
            departments.clone(),
        ));
        let generator = ProtocolGenerator::new(Arc::new(CountingSequencer::new(messages.clone())));
        let submissions = Arc::new(SubmissionService::new(
            employees.clone(),
            messages.clone(),
            generator,
            audit.clone(),
            departments.clone(),
        ));
        let admin = Arc::new(AdminService::new(
            employees,
            messages.clone(),
            logs.clone(),
            resets,
            identity.clone(),
            Arc::new(XlsxExporter::new()),
            audit,
            departments.clone(),
            false,
        ));

        auth.ensure_admin(ADMIN_EMAIL, ADMIN_PASSWORD, "Portal Admin", "Diretoria")
            .await
            .unwrap();

        let state = AppState {
            auth: auth.clone(),
            submissions,
            admin,
            receipts: Arc::new(PdfReceiptRenderer::new()),
            departments,
            db: None,
            trust_proxy_headers: false,
        };

        Self {
            router: build_router(state),
            auth,
            identity,
            messages,
            logs,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        self.request_with_headers(method, uri, token, body, &[]).await
    }

    pub async fn request_with_headers(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse { status, headers, bytes }
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.json());
        response.json()["data"]["access_token"].as_str().unwrap().to_string()
    }

    pub async fn register(&self, email: &str, department: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/api/v1/auth/register",
            None,
            Some(serde_json::json!({
                "full_name": "Ana Souza",
                "national_id": "123.456.789-09",
                "department": department,
                "phone": "11 99999-0000",
                "email": email,
                "password": "employee-secret-1"
            })),
        )
        .await
    }
}
