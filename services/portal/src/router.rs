use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use portal_core::health::healthz;
use portal_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    admin::{create_user, delete_user, list_requests, list_users, update_request_status},
    health::readyz,
    password_reset::{forgot_password, reset_password, validate_reset_token},
    request::{create_request, list_my_requests},
    session::{change_password, login, logout, me},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/auth/login", post(login))
        .route("/auth/session", get(me))
        .route("/auth/session", delete(logout))
        .route("/auth/password", patch(change_password))
        // Password reset
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", get(validate_reset_token))
        .route("/auth/reset-password", post(reset_password))
        // Staff
        .route("/admin/users", get(list_users))
        .route("/admin/users", post(create_user))
        .route("/admin/users/{id}", delete(delete_user))
        .route("/admin/requests", get(list_requests))
        .route("/admin/requests/{id}", patch(update_request_status))
        // Evaluation requests
        .route("/requests", post(create_request))
        .route("/requests/@me", get(list_my_requests))
        .layer(propagate_request_id_layer())
        .layer(trace_layer())
        .layer(request_id_layer())
        .with_state(state)
}
