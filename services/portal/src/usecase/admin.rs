use chrono::Utc;
use uuid::Uuid;

use portal_domain::user::UserRole;

use crate::domain::password::hash_password_blocking;
use crate::domain::repository::UserRepository;
use crate::domain::types::{PortalUser, is_acceptable_password, normalize_email};
use crate::error::PortalError;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self) -> Result<Vec<PortalUser>, PortalError> {
        self.users.list().await
    }
}

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub email: String,
    pub document: String,
    pub name: String,
    pub role: UserRole,
    pub password: String,
}

pub struct CreateUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CreateUserUseCase<U> {
    /// New accounts start with the first-access flag set, so the initial
    /// password handed out by staff must be changed on first login.
    pub async fn execute(&self, input: CreateUserInput) -> Result<PortalUser, PortalError> {
        let email = normalize_email(&input.email);
        let document = input.document.trim().to_owned();
        let name = input.name.trim().to_owned();
        if email.is_empty() || document.is_empty() || name.is_empty() {
            return Err(PortalError::MissingData);
        }
        if !is_acceptable_password(&input.password) {
            return Err(PortalError::InvalidPassword);
        }

        let password_hash = hash_password_blocking(input.password).await?;
        let now = Utc::now();
        let user = PortalUser {
            id: Uuid::now_v7(),
            email,
            document,
            name,
            password_hash,
            role: input.role,
            reset_token: None,
            first_access: true,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, actor_id: Uuid, user_id: Uuid) -> Result<(), PortalError> {
        if actor_id == user_id {
            return Err(PortalError::Forbidden);
        }
        if !self.users.delete_detaching_requests(user_id).await? {
            return Err(PortalError::NotFound);
        }
        tracing::info!(%actor_id, %user_id, "user deleted");
        Ok(())
    }
}
