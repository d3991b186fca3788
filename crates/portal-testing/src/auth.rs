//! Signed session helpers for HTTP tests.
//!
//! Protected routes verify a real session JWT, so tests sign one with the
//! same secret the router under test was built with.

use axum::http::{HeaderValue, header::AUTHORIZATION, header::COOKIE};
use uuid::Uuid;

use portal_auth_types::cookie::PORTAL_SESSION;
use portal_auth_types::token::issue_session_token;
use portal_domain::user::UserRole;

/// Identity to sign into a test session credential.
pub struct MockSession {
    pub user_id: Uuid,
    pub role: UserRole,
    pub first_access: bool,
    secret: String,
}

impl MockSession {
    pub fn new(user_id: Uuid, role: UserRole, secret: &str) -> Self {
        Self {
            user_id,
            role,
            first_access: false,
            secret: secret.to_owned(),
        }
    }

    pub fn with_first_access(mut self) -> Self {
        self.first_access = true;
        self
    }

    /// Signed session JWT for this identity.
    pub fn token(&self) -> String {
        let (token, _) =
            issue_session_token(self.user_id, self.role, self.first_access, &self.secret)
                .expect("sign test session");
        token
    }

    /// `Authorization: Bearer <jwt>` header pair.
    pub fn bearer(&self) -> (http::HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap();
        (AUTHORIZATION, value)
    }

    /// `Cookie: portal_session=<jwt>` header pair.
    pub fn cookie(&self) -> (http::HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("{PORTAL_SESSION}={}", self.token())).unwrap();
        (COOKIE, value)
    }
}
