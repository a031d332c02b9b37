//! Handler tests driving the full router with in-memory backends.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        Request, StatusCode,
    },
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use super::{AppState, GateConfig};
use crate::api::router;
use crate::auth::{
    password, Authenticator, HashScheme, MemoryCredentialStore, SessionStore, StaticUser,
};
use crate::authz::{Policy, RuleConfig};

fn static_user(username: &str, password_plain: &str, enabled: bool, roles: &[&str]) -> StaticUser {
    StaticUser {
        username: username.to_string(),
        password_hash: password::sha256_hash(password_plain),
        algorithm: HashScheme::Sha256,
        enabled,
        roles: roles.iter().map(ToString::to_string).collect(),
    }
}

fn rule(pattern: &str, roles: &[&str]) -> RuleConfig {
    RuleConfig {
        pattern: pattern.to_string(),
        roles: roles.iter().map(ToString::to_string).collect(),
        match_mode: None,
    }
}

fn portal_router() -> Router {
    let store = MemoryCredentialStore::new([
        static_user("ilya", "ilya", true, &["EMPLOYEE"]),
        static_user("nikita", "nikita", true, &["HR", "MANAGER"]),
        static_user("darya", "darya", true, &["HR"]),
        static_user("boris", "boris", false, &["EMPLOYEE"]),
    ]);
    let policy = Policy::from_rules(vec![
        rule("/", &["EMPLOYEE", "HR", "MANAGER"]),
        rule("/hr_info", &["HR"]),
        rule("/manager_info/**", &["MANAGER"]),
    ])
    .expect("valid rules");
    let state = AppState::new(
        Authenticator::new(Arc::new(store), Duration::from_secs(1)),
        SessionStore::new(Duration::from_secs(60)),
        policy,
        GateConfig::new(),
    );
    router(Arc::new(state))
}

fn login_request(username: &str, password_plain: &str) -> Result<Request<Body>> {
    let payload = json!({ "username": username, "password": password_plain });
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .context("failed to build login request")
}

async fn login_token(app: &Router, username: &str, password_plain: &str) -> Result<String> {
    let response = app
        .clone()
        .oneshot(login_request(username, password_plain)?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing session cookie")?
        .to_str()?;
    let token = cookie
        .strip_prefix("ruolo_session=")
        .and_then(|rest| rest.split(';').next())
        .context("malformed session cookie")?;
    Ok(token.to_string())
}

#[tokio::test]
async fn login_success_sets_httponly_cookie() -> Result<()> {
    let app = portal_router();
    let response = app.oneshot(login_request("ilya", "ilya")?).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .context("missing cookie")?
        .to_str()?;
    assert!(cookie.starts_with("ruolo_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    Ok(())
}

#[tokio::test]
async fn login_failures_are_uniform_for_unknown_user_and_wrong_password() -> Result<()> {
    let app = portal_router();
    let unknown = app.clone().oneshot(login_request("ghost", "ilya")?).await?;
    let wrong = app.clone().oneshot(login_request("ilya", "wrong")?).await?;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    let unknown_body = axum::body::to_bytes(unknown.into_body(), usize::MAX).await?;
    let wrong_body = axum::body::to_bytes(wrong.into_body(), usize::MAX).await?;
    assert_eq!(unknown_body, wrong_body);
    Ok(())
}

#[tokio::test]
async fn disabled_account_gets_distinct_rejection() -> Result<()> {
    let app = portal_router();
    let response = app.oneshot(login_request("boris", "boris")?).await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn login_without_payload_is_bad_request() -> Result<()> {
    let app = portal_router();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn anonymous_request_is_challenged() -> Result<()> {
    let app = portal_router();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));
    Ok(())
}

#[tokio::test]
async fn employee_reaches_root_but_not_hr_info() -> Result<()> {
    let app = portal_router();
    let token = login_token(&app, "ilya", "ilya").await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&axum::body::to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["principal"], "ilya");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/hr_info")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn hr_cannot_reach_manager_pages() -> Result<()> {
    let app = portal_router();
    let token = login_token(&app, "darya", "darya").await?;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/manager_info/42")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn bearer_token_works_like_the_cookie() -> Result<()> {
    let app = portal_router();
    let token = login_token(&app, "nikita", "nikita").await?;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/manager_info/42")
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unlisted_path_is_denied_even_when_authenticated() -> Result<()> {
    let app = portal_router();
    let token = login_token(&app, "nikita", "nikita").await?;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/payroll/export")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn session_endpoint_reports_principal() -> Result<()> {
    let app = portal_router();
    let token = login_token(&app, "darya", "darya").await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/session")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&axum::body::to_bytes(response.into_body(), usize::MAX).await?)?;
    assert_eq!(body["username"], "darya");
    assert_eq!(body["roles"], json!(["HR"]));

    let response = app
        .oneshot(Request::builder().uri("/session").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_session() -> Result<()> {
    let app = portal_router();
    let token = login_token(&app, "ilya", "ilya").await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = response
        .headers()
        .get(SET_COOKIE)
        .context("missing clearing cookie")?
        .to_str()?;
    assert!(cleared.contains("Max-Age=0"));

    // The old token no longer authenticates.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header(COOKIE, format!("ruolo_session={token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn health_is_reachable_without_a_session() -> Result<()> {
    let app = portal_router();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}
