use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness probe. Readiness depends on each
/// service's own backends, so services mount their own `/readyz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
