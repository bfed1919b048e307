//! HTTP handlers

pub mod admin;
pub mod auth;
pub mod departments;
pub mod health;
pub mod messages;

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};

/// File download with a `Content-Disposition: attachment` header.
pub(crate) fn attachment(filename: &str, content_type: &str, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_str(content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_str(&disposition)
                    .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
            ),
        ],
        bytes,
    )
        .into_response()
}
