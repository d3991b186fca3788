use chrono::Utc;
use rand::RngExt;

use crate::domain::password::hash_password_blocking;
use crate::domain::repository::{ResetNotifier, UserRepository};
use crate::domain::types::{
    RESET_TOKEN_BYTES, ResetToken, is_acceptable_password, normalize_email,
};
use crate::error::PortalError;

/// 256 bits from the thread-local CSPRNG, hex-encoded (64 chars).
fn generate_reset_token() -> String {
    let bytes: [u8; RESET_TOKEN_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

/// Reset link embedded in the notification.
pub fn reset_link(public_base_url: &str, token: &str) -> String {
    format!(
        "{}/reset-password?token={}",
        public_base_url.trim_end_matches('/'),
        token
    )
}

// ── Issue ────────────────────────────────────────────────────────────────────

pub struct IssueResetTokenInput {
    pub email: String,
}

pub struct IssueResetTokenUseCase<U, N>
where
    U: UserRepository,
    N: ResetNotifier,
{
    pub users: U,
    pub notifier: N,
    pub public_base_url: String,
}

impl<U, N> IssueResetTokenUseCase<U, N>
where
    U: UserRepository,
    N: ResetNotifier,
{
    /// Unknown emails succeed without writing anything, so the caller's
    /// response never reveals whether the account exists.
    pub async fn execute(&self, input: IssueResetTokenInput) -> Result<(), PortalError> {
        let email = normalize_email(&input.email);
        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!("password reset requested for unknown email");
            return Ok(());
        };

        let token = ResetToken::new(generate_reset_token(), Utc::now());
        self.users.set_reset_token(user.id, &token).await?;

        // The token stays valid if delivery fails; it lapses on its own.
        let link = reset_link(&self.public_base_url, &token.token);
        self.notifier
            .send_reset_link(&user.email, &user.name, &link)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user.id, error = %e, "reset link delivery failed");
            })?;

        tracing::info!(user_id = %user.id, "password reset token issued");
        Ok(())
    }
}

// ── Validate ─────────────────────────────────────────────────────────────────

pub struct ValidateResetTokenUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ValidateResetTokenUseCase<U> {
    pub async fn execute(&self, token: &str) -> Result<bool, PortalError> {
        if token.is_empty() {
            return Ok(false);
        }
        self.users.reset_token_is_valid(token, Utc::now()).await
    }
}

// ── Consume ──────────────────────────────────────────────────────────────────

pub struct ConsumeResetTokenInput {
    pub token: String,
    pub password: String,
}

pub struct ConsumeResetTokenUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ConsumeResetTokenUseCase<U> {
    pub async fn execute(&self, input: ConsumeResetTokenInput) -> Result<(), PortalError> {
        if !is_acceptable_password(&input.password) {
            return Err(PortalError::InvalidPassword);
        }
        if input.token.is_empty() {
            return Err(PortalError::InvalidOrExpired);
        }

        // Hash before the conditional update so match-and-clear is one statement.
        let password_hash = hash_password_blocking(input.password).await?;
        let consumed = self
            .users
            .consume_reset_token(&input.token, Utc::now(), &password_hash)
            .await?;
        if !consumed {
            return Err(PortalError::InvalidOrExpired);
        }
        Ok(())
    }
}
