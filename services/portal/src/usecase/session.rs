use anyhow::anyhow;
use uuid::Uuid;

use portal_auth_types::token::issue_session_token;
use portal_domain::user::UserRole;

use crate::domain::password::{
    hash_password_blocking, verify_dummy_blocking, verify_password_blocking,
};
use crate::domain::repository::UserRepository;
use crate::domain::types::{PortalUser, is_acceptable_password, normalize_email};
use crate::error::PortalError;

/// A freshly signed session credential and the identity it carries.
#[derive(Debug)]
pub struct SessionOutput {
    pub user_id: Uuid,
    pub role: UserRole,
    pub first_access: bool,
    pub session_token: String,
    pub expires_at: u64,
}

fn sign_session(
    user: &PortalUser,
    first_access: bool,
    secret: &str,
) -> Result<SessionOutput, PortalError> {
    let (session_token, expires_at) =
        issue_session_token(user.id, user.role, first_access, secret)
            .map_err(|e| anyhow!("sign session token: {e}"))?;
    Ok(SessionOutput {
        user_id: user.id,
        role: user.role,
        first_access,
        session_token,
        expires_at,
    })
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> LoginUseCase<U> {
    /// Unknown email and wrong password fail identically.
    pub async fn execute(&self, input: LoginInput) -> Result<SessionOutput, PortalError> {
        let Some(user) = self
            .users
            .find_by_email(&normalize_email(&input.email))
            .await?
        else {
            // Same Argon2 cost as a real check.
            verify_dummy_blocking(input.password).await?;
            return Err(PortalError::InvalidCredentials);
        };

        if !verify_password_blocking(user.password_hash.clone(), input.password).await? {
            return Err(PortalError::InvalidCredentials);
        }

        let out = sign_session(&user, user.first_access, &self.jwt_secret)?;
        tracing::info!(user_id = %user.id, role = %user.role, "session issued");
        Ok(out)
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> ChangePasswordUseCase<U> {
    /// Completes the first-access flow as a side effect. Returns a reissued
    /// session whose `first_access` claim is cleared.
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: ChangePasswordInput,
    ) -> Result<SessionOutput, PortalError> {
        // A session can outlive its account.
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(PortalError::Unauthenticated)?;

        let current_ok =
            verify_password_blocking(user.password_hash.clone(), input.current_password).await?;
        if !current_ok {
            return Err(PortalError::InvalidCredentials);
        }
        if !is_acceptable_password(&input.new_password) {
            return Err(PortalError::InvalidPassword);
        }

        let password_hash = hash_password_blocking(input.new_password).await?;
        self.users.update_password(user.id, &password_hash).await?;

        sign_session(&user, false, &self.jwt_secret)
    }
}
