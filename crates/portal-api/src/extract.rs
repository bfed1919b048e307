//! Request extractors: the signed-in session and the caller's address

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use portal_security::SessionContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Live session resolved from `Authorization: Bearer <token>`.
pub struct CurrentSession(pub SessionContext);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("malformed authorization header".into()))?;

        let session = state.auth.authenticate(token)?;
        Ok(CurrentSession(session))
    }
}

/// Client address for the audit trail. The socket peer unless forwarding
/// headers are trusted, in which case the first `X-Forwarded-For` hop wins,
/// then `X-Real-IP`.
pub struct ClientIp(pub Option<String>);

impl FromRequestParts<AppState> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_ip(parts, state.trust_proxy_headers)))
    }
}

fn client_ip(parts: &Parts, trust_proxy_headers: bool) -> Option<String> {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    let peer = || {
        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
    };

    if trust_proxy_headers {
        header("x-forwarded-for")
            .or_else(|| header("x-real-ip"))
            .or_else(peer)
    } else {
        peer()
    }
}
