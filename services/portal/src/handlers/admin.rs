use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use portal_auth_types::session::Session;
use portal_core::serde::to_rfc3339_ms;
use portal_domain::request::RequestStatus;
use portal_domain::user::UserRole;

use crate::domain::types::PortalUser;
use crate::error::PortalError;
use crate::handlers::request::RequestResponse;
use crate::state::AppState;
use crate::usecase::admin::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, ListUsersUseCase,
};
use crate::usecase::request::{ListRequestsUseCase, UpdateRequestStatusUseCase};

/// Outward view of an account. Never carries the password hash or reset token.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub document: String,
    pub name: String,
    pub role: UserRole,
    pub first_access: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<PortalUser> for UserResponse {
    fn from(user: PortalUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            document: user.document,
            name: user.name,
            role: user.role,
            first_access: user.first_access,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /admin/users ──────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<UserResponse>>, PortalError> {
    session.require(UserRole::STAFF)?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── POST /admin/users ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub document: String,
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    pub password: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), PortalError> {
    session.require(&[UserRole::Admin])?;
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            email: body.email,
            document: body.document,
            name: body.name,
            role: body.role,
            password: body.password,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ── DELETE /admin/users/{id} ──────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, PortalError> {
    session.require(&[UserRole::Admin])?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(session.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /admin/requests ───────────────────────────────────────────────────────

pub async fn list_requests(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<RequestResponse>>, PortalError> {
    session.require(UserRole::STAFF)?;
    let usecase = ListRequestsUseCase {
        requests: state.request_repo(),
    };
    let requests = usecase.execute(None).await?;
    Ok(Json(requests.into_iter().map(RequestResponse::from).collect()))
}

// ── PATCH /admin/requests/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRequestStatusRequest {
    pub status: RequestStatus,
}

pub async fn update_request_status(
    State(state): State<AppState>,
    session: Session,
    Path(request_id): Path<Uuid>,
    Json(body): Json<UpdateRequestStatusRequest>,
) -> Result<StatusCode, PortalError> {
    session.require(UserRole::STAFF)?;
    let usecase = UpdateRequestStatusUseCase {
        requests: state.request_repo(),
    };
    usecase.execute(request_id, body.status).await?;
    tracing::info!(
        actor_id = %session.user_id,
        %request_id,
        status = ?body.status,
        "request status updated"
    );
    Ok(StatusCode::NO_CONTENT)
}
