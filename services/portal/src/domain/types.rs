use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use portal_domain::request::RequestStatus;
use portal_domain::user::UserRole;

/// Reset token size in bytes before hex encoding (256 bits).
pub const RESET_TOKEN_BYTES: usize = 32;

/// Reset token time-to-live in seconds.
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;

/// Minimum accepted password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Portal account as seen by the use cases.
#[derive(Debug, Clone)]
pub struct PortalUser {
    pub id: Uuid,
    pub email: String,
    pub document: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub reset_token: Option<ResetToken>,
    pub first_access: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored password-reset token. Token and expiry only exist together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn new(token: String, issued_at: DateTime<Utc>) -> Self {
        Self {
            token,
            expires_at: issued_at + Duration::seconds(RESET_TOKEN_TTL_SECS),
        }
    }

    /// Expiry is exclusive: a token is dead at `expires_at` itself.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Evaluation request submitted through the portal.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub id: Uuid,
    /// `None` once the owning account has been deleted.
    pub user_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Emails are compared case-insensitively and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_acceptable_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}
