//! Policy gate: every path not served by a dedicated route lands here.
//!
//! Flow Overview: resolve the session (anonymous when absent or expired), ask
//! the policy engine, and translate the decision to HTTP — 200 pass-through,
//! 401 login challenge, or 403 denial. Within one request authentication
//! strictly precedes authorization.

use axum::{
    extract::Extension,
    http::{header::WWW_AUTHENTICATE, HeaderMap, HeaderValue, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use super::session::extract_session_token;
use super::state::AppState;
use crate::authz::{Decision, DenyReason};

pub async fn gate(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    uri: Uri,
) -> impl IntoResponse {
    let principal = match extract_session_token(&headers) {
        Some(token) => state.sessions().resolve(&token).await,
        None => None,
    };

    let decision = state.policy().authorize(principal.as_deref(), uri.path());
    debug!(path = uri.path(), %decision, "policy decision");

    match decision {
        Decision::Allow => {
            // The protected handler would run here; this gateway answers with
            // the granted context instead.
            let username = principal.as_deref().map(|p| p.username().to_string());
            (
                StatusCode::OK,
                Json(json!({
                    "path": uri.path(),
                    "principal": username,
                })),
            )
                .into_response()
        }
        Decision::Deny(DenyReason::AuthenticationRequired) => {
            let mut response_headers = HeaderMap::new();
            response_headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            (
                StatusCode::UNAUTHORIZED,
                response_headers,
                Json(json!({
                    "error": "authentication required",
                    "login": "/login",
                })),
            )
                .into_response()
        }
        Decision::Deny(DenyReason::Forbidden) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "forbidden" })),
        )
            .into_response(),
    }
}
