use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use portal_auth_types::{
    cookie::{clear_session_cookie, set_session_cookie},
    session::Session,
};
use portal_domain::user::UserRole;

use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::session::{
    ChangePasswordInput, ChangePasswordUseCase, LoginInput, LoginUseCase, SessionOutput,
};

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub role: UserRole,
    pub first_access: bool,
    pub expires_at: u64,
}

impl From<&SessionOutput> for SessionResponse {
    fn from(out: &SessionOutput) -> Self {
        Self {
            user_id: out.user_id,
            role: out.role,
            first_access: out.first_access,
            expires_at: out.expires_at,
        }
    }
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let response = SessionResponse::from(&out);
    let jar = set_session_cookie(jar, out.session_token, state.cookie_domain.clone());
    Ok((StatusCode::CREATED, jar, Json(response)))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

pub async fn me(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: session.user_id,
        role: session.role,
        first_access: session.first_access,
        expires_at: session.expires_at,
    })
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

/// Clears the cookie only. Issued credentials stay valid until they expire.
pub async fn logout(
    State(state): State<AppState>,
    _session: Session,
    jar: CookieJar,
) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}

// ── PATCH /auth/password ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let out = usecase
        .execute(
            session.user_id,
            ChangePasswordInput {
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;

    let response = SessionResponse::from(&out);
    let jar = set_session_cookie(jar, out.session_token, state.cookie_domain.clone());
    Ok((StatusCode::OK, jar, Json(response)))
}
