mod common;

use axum::http::{header, Method, StatusCode};
use common::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};
use portal_core::repositories::{AuditLogRepository, IdentityProvider, MessageRepository};
use serde_json::json;

#[tokio::test]
async fn health_endpoints_answer() {
    let app = TestApp::spawn().await;

    let health = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "healthy");

    let ready = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn departments_are_public() {
    let app = TestApp::spawn().await;
    let response = app.request(Method::GET, "/api/v1/departments", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let names = response.json()["data"].as_array().unwrap().len();
    assert_eq!(names, portal_shared::constants::DEFAULT_DEPARTMENTS.len());
}

#[tokio::test]
async fn register_login_submit_and_download_receipt() {
    let app = TestApp::spawn().await;
    assert_eq!(app.register("ana@x.com", "Estoque").await.status, StatusCode::CREATED);
    let token = app.login("ana@x.com", "employee-secret-1").await;

    let first = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(&token),
            Some(json!({ "message_type": "complaint", "target_department": "TI", "body": "Printer is broken" })),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let body = first.json();
    assert_eq!(body["data"]["state"], "sent");
    let protocol = body["data"]["message"]["protocol"].as_str().unwrap().to_string();
    assert!(protocol.starts_with('#') && protocol.ends_with("-0001"));
    assert_eq!(body["data"]["receipt"]["protocol"], protocol.as_str());
    assert_eq!(body["data"]["receipt"]["origin_department"], "Estoque");
    assert_eq!(body["data"]["receipt"]["status_line"], "Message officially sent");

    let second = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(&token),
            Some(json!({ "target_department": "RH", "body": "More coffee please" })),
        )
        .await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert!(second.json()["data"]["message"]["protocol"].as_str().unwrap().ends_with("-0002"));
    assert_eq!(second.json()["data"]["message"]["message_type"], "suggestion");

    let id = body["data"]["message"]["id"].as_str().unwrap();
    let receipt = app
        .request(Method::GET, &format!("/api/v1/messages/{}/receipt", id), Some(&token), None)
        .await;
    assert_eq!(receipt.status, StatusCode::OK);
    assert_eq!(receipt.headers[header::CONTENT_TYPE], "application/pdf");
    let disposition = receipt.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.contains("receipt-") && disposition.contains(".pdf"));
    assert!(receipt.bytes.starts_with(b"%PDF-"));
    let contains = |needle: &[u8]| receipt.bytes.windows(needle.len()).any(|w| w == needle);
    assert!(contains(protocol.as_bytes()));
    assert!(!contains(b"Printer is broken"));
}

#[tokio::test]
async fn forwarded_for_header_is_not_trusted_by_default() {
    let app = TestApp::spawn().await;
    assert_eq!(app.register("ana@x.com", "Estoque").await.status, StatusCode::CREATED);

    let response = app
        .request_with_headers(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ana@x.com", "password": "employee-secret-1" })),
            &[("x-forwarded-for", "203.0.113.9"), ("x-real-ip", "203.0.113.9")],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let entries = app.logs.list_recent().await.unwrap();
    assert!(entries.iter().any(|e| e.action == "login"));
    assert!(entries.iter().all(|e| e.ip.as_deref() != Some("203.0.113.9")));
}

#[tokio::test]
async fn account_without_directory_record_cannot_submit() {
    let app = TestApp::spawn().await;
    app.identity.create_account("ana@x.com", "employee-secret-1").await.unwrap();
    let token = app.login("ana@x.com", "employee-secret-1").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/messages",
            Some(&token),
            Some(json!({ "message_type": "report", "target_department": "TI", "body": "hello" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let body = response.json();
    assert_eq!(body["error"]["code"], "EMPLOYEE_NOT_REGISTERED");
    assert_eq!(body["data"]["state"], "draft");
    assert_eq!(body["data"]["draft"]["body"], "hello");
    assert!(app.messages.list_recent().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_registration_points_to_reset_request() {
    let app = TestApp::spawn().await;
    app.register("ana@x.com", "Estoque").await;
    let again = app.register("ana@x.com", "Estoque").await;

    assert_eq!(again.status, StatusCode::CONFLICT);
    assert!(again.json()["error"]["message"]
        .as_str()
        .unwrap()
        .contains("password reset"));
}

#[tokio::test]
async fn session_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let response = app
        .request(Method::POST, "/api/v1/messages", None, Some(json!({ "body": "x", "target_department": "TI" })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request(Method::GET, "/api/v1/auth/me", Some("garbage"), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let app = TestApp::spawn().await;
    app.register("ana@x.com", "Estoque").await;
    let token = app.login("ana@x.com", "employee-secret-1").await;

    assert_eq!(app.request(Method::GET, "/api/v1/auth/me", Some(&token), None).await.status, StatusCode::OK);
    assert_eq!(
        app.request(Method::POST, "/api/v1/auth/logout", Some(&token), None).await.status,
        StatusCode::OK
    );
    assert_eq!(
        app.request(Method::GET, "/api/v1/auth/me", Some(&token), None).await.status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn console_is_admin_only() {
    let app = TestApp::spawn().await;
    app.register("ana@x.com", "Estoque").await;
    let token = app.login("ana@x.com", "employee-secret-1").await;

    let response = app.request(Method::GET, "/api/v1/admin/messages", Some(&token), None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_filters_and_exports_messages() {
    let app = TestApp::spawn().await;
    app.register("ana@x.com", "Estoque").await;
    let employee = app.login("ana@x.com", "employee-secret-1").await;
    for (kind, target) in [("complaint", "TI"), ("suggestion", "RH"), ("complaint", "RH")] {
        let response = app
            .request(
                Method::POST,
                "/api/v1/messages",
                Some(&employee),
                Some(json!({ "message_type": kind, "target_department": target, "body": "text" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let filtered = app
        .request(Method::GET, "/api/v1/admin/messages?type=complaint&department=&date=", Some(&admin), None)
        .await;
    assert_eq!(filtered.status, StatusCode::OK);
    assert_eq!(filtered.json()["data"].as_array().unwrap().len(), 2);

    let bad = app
        .request(Method::GET, "/api/v1/admin/messages?date=yesterday", Some(&admin), None)
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let export = app
        .request(Method::GET, "/api/v1/admin/messages/export?type=complaint", Some(&admin), None)
        .await;
    assert_eq!(export.status, StatusCode::OK);
    assert_eq!(
        export.headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(export.headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("messages_audit.xlsx"));
    assert_eq!(&export.bytes[..2], b"PK");

    let logs = app.request(Method::GET, "/api/v1/admin/logs", Some(&admin), None).await;
    let actions: Vec<String> = logs.json()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap().to_string())
        .collect();
    assert!(actions.iter().any(|a| a == "exported messages"));
    assert_eq!(actions.iter().filter(|a| *a == "sent message").count(), 3);
}

#[tokio::test]
async fn employee_commands_need_confirmation() {
    let app = TestApp::spawn().await;
    let created = app.register("ana@x.com", "Estoque").await.json();
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let cancelled = app
        .request(
            Method::POST,
            &format!("/api/v1/admin/employees/{}/block", id),
            Some(&admin),
            Some(json!({ "confirm": false })),
        )
        .await;
    assert_eq!(cancelled.json()["data"]["outcome"], "cancelled");

    let blocked = app
        .request(
            Method::POST,
            &format!("/api/v1/admin/employees/{}/block", id),
            Some(&admin),
            Some(json!({ "confirm": true })),
        )
        .await;
    assert_eq!(blocked.json()["data"]["outcome"], "applied");
    assert_eq!(blocked.json()["data"]["result"]["active"], false);

    let login = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "ana@x.com", "password": "employee-secret-1" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);

    let deleted = app
        .request(Method::DELETE, &format!("/api/v1/admin/employees/{}?confirm=true", id), Some(&admin), None)
        .await;
    assert_eq!(deleted.json()["data"]["outcome"], "applied");
}

#[tokio::test]
async fn password_reset_request_and_fulfilment() {
    let app = TestApp::spawn().await;
    app.register("ana@x.com", "Estoque").await;

    let requested = app
        .request(
            Method::POST,
            "/api/v1/auth/reset-requests",
            None,
            Some(json!({ "email": "ana@x.com" })),
        )
        .await;
    assert_eq!(requested.status, StatusCode::CREATED);

    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let pending = app.request(Method::GET, "/api/v1/admin/reset-requests", Some(&admin), None).await;
    assert_eq!(pending.json()["data"].as_array().unwrap().len(), 1);

    let fulfilled = app
        .request(
            Method::POST,
            "/api/v1/admin/reset-requests/fulfill",
            Some(&admin),
            Some(json!({ "email": "ana@x.com", "new_password": "brand-new-pass", "confirm": true })),
        )
        .await;
    assert_eq!(fulfilled.json()["data"]["result"], 1);

    app.login("ana@x.com", "brand-new-pass").await;
    let pending = app.request(Method::GET, "/api/v1/admin/reset-requests", Some(&admin), None).await;
    assert!(pending.json()["data"].as_array().unwrap().is_empty());
}
