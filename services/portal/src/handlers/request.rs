use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use portal_auth_types::session::Session;
use portal_core::serde::to_rfc3339_ms;
use portal_domain::request::RequestStatus;

use crate::domain::types::EvaluationRequest;
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::request::{CreateRequestInput, CreateRequestUseCase, ListRequestsUseCase};

#[derive(Serialize)]
pub struct RequestResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: RequestStatus,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<EvaluationRequest> for RequestResponse {
    fn from(request: EvaluationRequest) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            title: request.title,
            description: request.description,
            status: request.status,
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

// ── POST /requests ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRequestRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

pub async fn create_request(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CreateRequestRequest>,
) -> Result<(StatusCode, Json<RequestResponse>), PortalError> {
    session.require(&[])?;
    let usecase = CreateRequestUseCase {
        requests: state.request_repo(),
    };
    let request = usecase
        .execute(
            session.user_id,
            CreateRequestInput {
                title: body.title,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(RequestResponse::from(request))))
}

// ── GET /requests/@me ─────────────────────────────────────────────────────────

pub async fn list_my_requests(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<RequestResponse>>, PortalError> {
    session.require(&[])?;
    let usecase = ListRequestsUseCase {
        requests: state.request_repo(),
    };
    let requests = usecase.execute(Some(session.user_id)).await?;
    Ok(Json(requests.into_iter().map(RequestResponse::from).collect()))
}
