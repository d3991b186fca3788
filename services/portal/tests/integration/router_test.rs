//! HTTP-level tests for paths that resolve before any store access.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE, header::SET_COOKIE},
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use portal::infra::mailer::HttpMailer;
use portal::router::build_router;
use portal::state::AppState;
use portal_core::middleware::X_REQUEST_ID;
use portal_domain::user::UserRole;
use portal_testing::auth::MockSession;
use portal_testing::body::json_body;

use crate::helpers::{TEST_BASE_URL, TEST_JWT_SECRET};

fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        mailer: HttpMailer::new(
            "http://127.0.0.1:9/send".to_owned(),
            "test-key".to_owned(),
            "noreply@example.com".to_owned(),
        ),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        cookie_domain: "portal.example.com".to_owned(),
        public_base_url: TEST_BASE_URL.to_owned(),
    })
}

fn session(role: UserRole) -> MockSession {
    MockSession::new(Uuid::now_v7(), role, TEST_JWT_SECRET)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_liveness_and_attach_request_id() {
    let response = app().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let response = app().oneshot(get("/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ── Role gate ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_401_without_session() {
    let response = app().oneshot(get("/admin/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn should_return_401_for_forged_session() {
    let forged = MockSession::new(Uuid::now_v7(), UserRole::Admin, "some-other-secret");
    let (name, value) = forged.bearer();
    let request = Request::builder()
        .uri("/admin/users")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_return_403_for_user_on_staff_route() {
    let (name, value) = session(UserRole::User).bearer();
    let request = Request::builder()
        .uri("/admin/users")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_return_403_for_support_on_admin_only_route() {
    let (name, value) = session(UserRole::Support).cookie();
    let mut request = json_request(
        "POST",
        "/admin/users",
        json!({
            "email": "new@example.com",
            "document": "12345678900",
            "name": "New Client",
            "password": "Initial1!",
        }),
    );
    request.headers_mut().insert(name, value);

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_return_403_for_user_deleting_accounts() {
    let (name, value) = session(UserRole::User).bearer();
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/admin/users/{}", Uuid::now_v7()))
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_return_401_when_creating_request_anonymously() {
    let request = json_request("POST", "/requests", json!({ "title": "Audit" }));
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ── First-access gate ────────────────────────────────────────────────────────

fn with_header(mut request: Request<Body>, mock: &MockSession) -> Request<Body> {
    let (name, value) = mock.bearer();
    request.headers_mut().insert(name, value);
    request
}

#[tokio::test]
async fn should_hold_first_access_admin_at_staff_routes() {
    let mock = session(UserRole::Admin).with_first_access();

    let response = app()
        .oneshot(with_header(get("/admin/users"), &mock))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "PASSWORD_CHANGE_REQUIRED");
}

#[tokio::test]
async fn should_hold_first_access_user_at_request_routes() {
    let mock = session(UserRole::User).with_first_access();
    let requests = [
        json_request("POST", "/requests", json!({ "title": "Audit" })),
        get("/requests/@me"),
    ];

    for request in requests {
        let response = app().oneshot(with_header(request, &mock)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert_eq!(body["kind"], "PASSWORD_CHANGE_REQUIRED");
    }
}

#[tokio::test]
async fn should_let_first_access_session_log_out() {
    let mock = session(UserRole::User).with_first_access();
    let request = Request::builder()
        .method("DELETE")
        .uri("/auth/session")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(with_header(request, &mock)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn should_let_first_access_session_reach_change_password() {
    let mock = session(UserRole::User).with_first_access();
    // Missing `new_password`: the body is rejected after the session gate.
    let request = json_request(
        "PATCH",
        "/auth/password",
        json!({ "current_password": "Initial1!" }),
    );

    let response = app().oneshot(with_header(request, &mock)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ── Session ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_describe_current_session() {
    let mock = session(UserRole::Admin).with_first_access();
    let (name, value) = mock.cookie();
    let request = Request::builder()
        .uri("/auth/session")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], mock.user_id.to_string());
    assert_eq!(body["role"], "ADMIN");
    assert_eq!(body["first_access"], true);
}

#[tokio::test]
async fn should_clear_cookie_on_logout() {
    let (name, value) = session(UserRole::User).cookie();
    let request = Request::builder()
        .method("DELETE")
        .uri("/auth/session")
        .header(name, value)
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cookie.starts_with("portal_session="), "got {cookie}");
    assert!(cookie.contains("Max-Age=0"), "got {cookie}");
}

// ── Password reset ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_empty_token_invalid() {
    for uri in ["/auth/reset-password?token=", "/auth/reset-password"] {
        let response = app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body, json!({ "valid": false }), "for {uri}");
    }
}

#[tokio::test]
async fn should_reject_short_password_on_reset() {
    let request = json_request(
        "POST",
        "/auth/reset-password",
        json!({ "token": "a".repeat(64), "password": "short" }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "INVALID_PASSWORD");
}

#[tokio::test]
async fn should_reject_empty_token_on_reset_with_generic_message() {
    let request = json_request(
        "POST",
        "/auth/reset-password",
        json!({ "token": "", "password": "NewPass1!" }),
    );

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "INVALID_OR_EXPIRED");
    assert_eq!(body["message"], "invalid or expired token");
}
