use chrono::Utc;
use uuid::Uuid;

use portal_domain::request::RequestStatus;

use crate::domain::repository::EvaluationRequestRepository;
use crate::domain::types::EvaluationRequest;
use crate::error::PortalError;

// ── CreateRequest ────────────────────────────────────────────────────────────

pub struct CreateRequestInput {
    pub title: String,
    pub description: String,
}

pub struct CreateRequestUseCase<R: EvaluationRequestRepository> {
    pub requests: R,
}

impl<R: EvaluationRequestRepository> CreateRequestUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: CreateRequestInput,
    ) -> Result<EvaluationRequest, PortalError> {
        let title = input.title.trim().to_owned();
        if title.is_empty() {
            return Err(PortalError::MissingData);
        }
        let now = Utc::now();
        let request = EvaluationRequest {
            id: Uuid::now_v7(),
            user_id: Some(user_id),
            title,
            description: input.description,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.requests.create(&request).await?;
        Ok(request)
    }
}

// ── ListRequests ─────────────────────────────────────────────────────────────

pub struct ListRequestsUseCase<R: EvaluationRequestRepository> {
    pub requests: R,
}

impl<R: EvaluationRequestRepository> ListRequestsUseCase<R> {
    /// `Some(user_id)` restricts to that user's own requests.
    pub async fn execute(
        &self,
        owner: Option<Uuid>,
    ) -> Result<Vec<EvaluationRequest>, PortalError> {
        match owner {
            Some(user_id) => self.requests.list_by_user(user_id).await,
            None => self.requests.list_all().await,
        }
    }
}

// ── UpdateRequestStatus ──────────────────────────────────────────────────────

pub struct UpdateRequestStatusUseCase<R: EvaluationRequestRepository> {
    pub requests: R,
}

impl<R: EvaluationRequestRepository> UpdateRequestStatusUseCase<R> {
    pub async fn execute(&self, id: Uuid, status: RequestStatus) -> Result<(), PortalError> {
        if !self.requests.update_status(id, status).await? {
            return Err(PortalError::NotFound);
        }
        Ok(())
    }
}
