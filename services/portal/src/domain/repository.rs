#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use portal_domain::request::RequestStatus;

use crate::domain::types::{EvaluationRequest, PortalUser, ResetToken};
use crate::error::PortalError;

/// Persistent user-record store.
pub trait UserRepository: Send + Sync {
    /// Look up by (already normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<PortalUser>, PortalError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PortalUser>, PortalError>;

    /// All users, oldest first.
    async fn list(&self) -> Result<Vec<PortalUser>, PortalError>;

    /// Insert a new user. Duplicate email or document yields `Conflict`.
    async fn create(&self, user: &PortalUser) -> Result<(), PortalError>;

    /// Replace the credential hash and clear the first-access flag.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), PortalError>;

    /// Overwrite the user's reset token and expiry in a single write.
    /// Concurrent calls: last writer wins.
    async fn set_reset_token(&self, id: Uuid, token: &ResetToken) -> Result<(), PortalError>;

    /// Whether some user holds `token` with an expiry strictly after `now`. Read-only.
    async fn reset_token_is_valid(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, PortalError>;

    /// Atomically, for the user holding `token` with expiry after `now`: set
    /// `password_hash`, clear token and expiry, clear the first-access flag.
    ///
    /// Returns `true` iff a row matched. Two concurrent calls with the same
    /// token cannot both return `true`.
    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<bool, PortalError>;

    /// Detach the user's evaluation requests, then delete the user, in one
    /// transaction. Returns `false` if the user does not exist.
    async fn delete_detaching_requests(&self, id: Uuid) -> Result<bool, PortalError>;
}

/// Store for evaluation requests.
pub trait EvaluationRequestRepository: Send + Sync {
    async fn create(&self, request: &EvaluationRequest) -> Result<(), PortalError>;

    /// All requests, newest first.
    async fn list_all(&self) -> Result<Vec<EvaluationRequest>, PortalError>;

    /// Requests owned by `user_id`, newest first.
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<EvaluationRequest>, PortalError>;

    /// Returns `false` if the request does not exist.
    async fn update_status(&self, id: Uuid, status: RequestStatus) -> Result<bool, PortalError>;
}

/// Outbound notification dispatcher for reset links.
///
/// Delivery is attempted once; failure is reported to the caller, never retried.
pub trait ResetNotifier: Send + Sync {
    async fn send_reset_link(
        &self,
        email: &str,
        name: &str,
        link: &str,
    ) -> Result<(), PortalError>;
}
