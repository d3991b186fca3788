//! Per-request session resolution and the role gate.
//!
//! Every protected request carries a signed session credential, either as
//! `Authorization: Bearer <jwt>` or in the [`PORTAL_SESSION`] cookie. The
//! credential is verified on each request; there is no server-side session
//! cache.

use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use http::request::Parts;
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use uuid::Uuid;

use portal_domain::user::UserRole;

use crate::cookie::PORTAL_SESSION;
use crate::token::validate_session_token;

/// Authenticated identity resolved from the session credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: UserRole,
    pub first_access: bool,
    pub expires_at: u64,
}

/// Reason a request was not allowed through.
///
/// A missing credential and a malformed, forged or expired one all map to
/// `Unauthenticated`. The other variants are only reachable once the identity
/// is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Deny {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("password change required")]
    PasswordChangeRequired,
}

impl Deny {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::PasswordChangeRequired => "PASSWORD_CHANGE_REQUIRED",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::PasswordChangeRequired => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for Deny {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (self.status(), axum::Json(body)).into_response()
    }
}

impl Session {
    /// Gate for every protected operation. An empty `roles` slice admits any
    /// role. A first-access session is turned away until its password is
    /// changed; only the session and change-password endpoints skip this gate.
    pub fn require(&self, roles: &[UserRole]) -> Result<(), Deny> {
        if self.first_access {
            return Err(Deny::PasswordChangeRequired);
        }
        if roles.is_empty() || roles.contains(&self.role) {
            Ok(())
        } else {
            Err(Deny::Forbidden)
        }
    }
}

/// Verify a credential and return the identity it carries, without any gate.
pub fn resolve(credential: Option<&str>, secret: &str) -> Result<Session, Deny> {
    let token = credential
        .filter(|t| !t.is_empty())
        .ok_or(Deny::Unauthenticated)?;
    let info = validate_session_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "session credential rejected");
        Deny::Unauthenticated
    })?;
    Ok(Session {
        user_id: info.user_id,
        role: info.role,
        first_access: info.first_access,
        expires_at: info.expires_at,
    })
}

/// Decide allow/deny for a credential against a set of permitted roles.
///
/// Pure: no I/O, no side effects. The caller turns a `Deny` into a response.
pub fn authorize(
    credential: Option<&str>,
    secret: &str,
    required_roles: &[UserRole],
) -> Result<Session, Deny> {
    let session = resolve(credential, secret)?;
    session.require(required_roles)?;
    Ok(session)
}

/// Pull the raw session credential from the request headers.
///
/// The `Authorization: Bearer` header takes precedence over the cookie.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_owned());
    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(PORTAL_SESSION)
            .map(|c| c.value().to_owned())
    })
}

/// Access to the HMAC secret used to verify session credentials.
pub trait SessionSecret {
    fn session_secret(&self) -> &str;
}

impl<S> FromRequestParts<S> for Session
where
    S: SessionSecret + Send + Sync,
{
    type Rejection = Deny;

    // Resolve synchronously, then hand back a 'static future: axum-core 0.5
    // declares this as `fn -> impl Future + Send`. Handlers apply `require`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let credential = extract_credential(&parts.headers);
        let result = resolve(credential.as_deref(), state.session_secret());
        async move { result }
    }
}
