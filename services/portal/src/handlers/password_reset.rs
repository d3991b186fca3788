use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::password_reset::{
    ConsumeResetTokenInput, ConsumeResetTokenUseCase, IssueResetTokenInput,
    IssueResetTokenUseCase, ValidateResetTokenUseCase,
};

const RESET_REQUESTED_MESSAGE: &str =
    "if the email is registered, a reset link has been sent";
const RESET_DONE_MESSAGE: &str = "password updated";

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /auth/forgot-password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, PortalError> {
    let usecase = IssueResetTokenUseCase {
        users: state.user_repo(),
        notifier: state.notifier(),
        public_base_url: state.public_base_url.clone(),
    };
    usecase
        .execute(IssueResetTokenInput { email: body.email })
        .await?;
    Ok(Json(MessageResponse {
        message: RESET_REQUESTED_MESSAGE,
    }))
}

// ── GET /auth/reset-password?token= ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ValidateResetQuery {
    #[serde(default)]
    pub token: String,
}

#[derive(Serialize)]
pub struct ValidateResetResponse {
    pub valid: bool,
}

pub async fn validate_reset_token(
    State(state): State<AppState>,
    Query(query): Query<ValidateResetQuery>,
) -> Result<Json<ValidateResetResponse>, PortalError> {
    let usecase = ValidateResetTokenUseCase {
        users: state.user_repo(),
    };
    let valid = usecase.execute(&query.token).await?;
    Ok(Json(ValidateResetResponse { valid }))
}

// ── POST /auth/reset-password ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, PortalError> {
    let usecase = ConsumeResetTokenUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(ConsumeResetTokenInput {
            token: body.token,
            password: body.password,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: RESET_DONE_MESSAGE,
    }))
}
