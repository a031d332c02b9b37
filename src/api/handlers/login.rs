//! Login endpoint: credentials in, session cookie out.
//!
//! Reachable by everyone (the form-login equivalent); rejections carry no hint
//! of whether the username exists.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use regex::Regex;
use secrecy::SecretString;
use std::sync::{Arc, LazyLock};
use tracing::error;

use super::session::{extract_session_token, session_cookie};
use super::state::AppState;
use super::types::{LoginRequest, SessionResponse};
use crate::auth::AuthFailure;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._-]{1,64}$").expect("username pattern is valid")
});

/// Syntactic username check; anything outside the charset fails authentication
/// without touching the store.
pub(super) fn valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; session cookie set", body = SessionResponse),
        (status = 400, description = "Missing payload", body = String),
        (status = 401, description = "Invalid username or password", body = String),
        (status = 403, description = "Account is disabled", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    headers: HeaderMap,
    state: Extension<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    if !valid_username(&request.username) {
        // Same rejection as a wrong password; no username probing.
        return (
            StatusCode::UNAUTHORIZED,
            "Invalid username or password".to_string(),
        )
            .into_response();
    }

    let secret = SecretString::from(request.password);
    let principal = match state
        .authenticator()
        .authenticate(&request.username, &secret)
        .await
    {
        Ok(principal) => principal,
        Err(AuthFailure::InvalidCredentials) => {
            return (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            )
                .into_response();
        }
        Err(AuthFailure::AccountDisabled) => {
            return (StatusCode::FORBIDDEN, "Account is disabled".to_string()).into_response();
        }
    };

    let response = SessionResponse {
        username: principal.username().to_string(),
        roles: principal.roles().iter().cloned().collect(),
    };

    // Re-login on a live session swaps the principal in place; otherwise a new
    // session is created.
    let mut reused = None;
    if let Some(existing) = extract_session_token(&headers) {
        if state.sessions().replace(&existing, principal.clone()).await {
            reused = Some(existing);
        }
    }
    let token = match reused {
        Some(token) => token,
        None => match state.sessions().insert(principal).await {
            Ok(token) => token,
            Err(err) => {
                error!("failed to create session: {err}");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        },
    };

    let mut response_headers = HeaderMap::new();
    match session_cookie(&state, &token) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("failed to build session cookie: {err}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    (StatusCode::OK, response_headers, Json(response)).into_response()
}
