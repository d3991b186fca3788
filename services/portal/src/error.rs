use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use portal_auth_types::session::Deny;

/// Portal service error variants.
///
/// Messages are deliberately generic: none of them reveals whether an email
/// or document exists, or whether a reset token existed versus expired.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("password change required")]
    PasswordChangeRequired,
    #[error("not found")]
    NotFound,
    #[error("invalid or expired token")]
    InvalidOrExpired,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password must be at least 8 characters")]
    InvalidPassword,
    #[error("missing data")]
    MissingData,
    #[error("already exists")]
    Conflict,
    #[error("internal error")]
    DependencyFailure(#[from] anyhow::Error),
}

impl PortalError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::PasswordChangeRequired => "PASSWORD_CHANGE_REQUIRED",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidOrExpired => "INVALID_OR_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::MissingData => "MISSING_DATA",
            Self::Conflict => "CONFLICT",
            Self::DependencyFailure(_) => "DEPENDENCY_FAILURE",
        }
    }
}

impl From<Deny> for PortalError {
    fn from(deny: Deny) -> Self {
        match deny {
            Deny::Unauthenticated => Self::Unauthenticated,
            Deny::Forbidden => Self::Forbidden,
            Deny::PasswordChangeRequired => Self::PasswordChangeRequired,
        }
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::PasswordChangeRequired => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidOrExpired | Self::InvalidPassword | Self::MissingData => {
                StatusCode::BAD_REQUEST
            }
            Self::Conflict => StatusCode::CONFLICT,
            Self::DependencyFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and TraceLayer already records their status.
        // Dependency failures carry the anyhow chain, which only goes to the log.
        if let Self::DependencyFailure(ref e) = self {
            tracing::error!(error = ?e, kind = "DEPENDENCY_FAILURE", "dependency failure");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
