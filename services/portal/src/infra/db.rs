use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use portal_domain::request::RequestStatus;
use portal_domain::user::UserRole;
use portal_schema::{evaluation_requests, users};

use crate::domain::repository::{EvaluationRequestRepository, UserRepository};
use crate::domain::types::{EvaluationRequest, PortalUser, ResetToken};
use crate::error::PortalError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<PortalUser>, PortalError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PortalUser>, PortalError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<PortalUser>, PortalError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn create(&self, user: &PortalUser) -> Result<(), PortalError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            document: Set(user.document.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_i16()),
            reset_token: Set(user.reset_token.as_ref().map(|t| t.token.clone())),
            reset_token_expiry: Set(user.reset_token.as_ref().map(|t| t.expires_at)),
            first_access: Set(user.first_access),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => PortalError::Conflict,
            _ => anyhow::Error::new(e).context("create user").into(),
        })?;
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), PortalError> {
        users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash.to_owned()))
            .col_expr(users::Column::FirstAccess, Expr::value(false))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update password")?;
        Ok(())
    }

    async fn set_reset_token(&self, id: Uuid, token: &ResetToken) -> Result<(), PortalError> {
        users::Entity::update_many()
            .col_expr(users::Column::ResetToken, Expr::value(token.token.clone()))
            .col_expr(users::Column::ResetTokenExpiry, Expr::value(token.expires_at))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set reset token")?;
        Ok(())
    }

    async fn reset_token_is_valid(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, PortalError> {
        let holder = users::Entity::find()
            .filter(users::Column::ResetToken.eq(token))
            .filter(users::Column::ResetTokenExpiry.gt(now))
            .one(&self.db)
            .await
            .context("check reset token")?;
        Ok(holder.is_some())
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<bool, PortalError> {
        // Match and clear in one UPDATE. A concurrent consumer blocks on the row
        // lock, then re-evaluates the WHERE against the cleared token and misses.
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(password_hash.to_owned()))
            .col_expr(users::Column::ResetToken, Expr::value(Option::<String>::None))
            .col_expr(
                users::Column::ResetTokenExpiry,
                Expr::value(Option::<DateTime<Utc>>::None),
            )
            .col_expr(users::Column::FirstAccess, Expr::value(false))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::ResetToken.eq(token))
            .filter(users::Column::ResetTokenExpiry.gt(now))
            .exec(&self.db)
            .await
            .context("consume reset token")?;
        Ok(result.rows_affected == 1)
    }

    async fn delete_detaching_requests(&self, id: Uuid) -> Result<bool, PortalError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    detach_requests(txn, id).await?;
                    delete_user(txn, id).await
                })
            })
            .await
            .context("delete user")?;
        Ok(deleted)
    }
}

async fn detach_requests(txn: &DatabaseTransaction, user_id: Uuid) -> Result<(), DbErr> {
    evaluation_requests::Entity::update_many()
        .col_expr(
            evaluation_requests::Column::UserId,
            Expr::value(Option::<Uuid>::None),
        )
        .filter(evaluation_requests::Column::UserId.eq(user_id))
        .exec(txn)
        .await?;
    Ok(())
}

async fn delete_user(txn: &DatabaseTransaction, id: Uuid) -> Result<bool, DbErr> {
    let result = users::Entity::delete_by_id(id).exec(txn).await?;
    Ok(result.rows_affected > 0)
}

fn user_from_model(model: users::Model) -> Result<PortalUser, PortalError> {
    let role = UserRole::from_i16(model.role)
        .ok_or_else(|| anyhow!("unknown role {} on user {}", model.role, model.id))?;
    let reset_token = match (model.reset_token, model.reset_token_expiry) {
        (Some(token), Some(expires_at)) => Some(ResetToken { token, expires_at }),
        _ => None,
    };
    Ok(PortalUser {
        id: model.id,
        email: model.email,
        document: model.document,
        name: model.name,
        password_hash: model.password_hash,
        role,
        reset_token,
        first_access: model.first_access,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Evaluation request repository ────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEvaluationRequestRepository {
    pub db: DatabaseConnection,
}

impl EvaluationRequestRepository for DbEvaluationRequestRepository {
    async fn create(&self, request: &EvaluationRequest) -> Result<(), PortalError> {
        evaluation_requests::ActiveModel {
            id: Set(request.id),
            user_id: Set(request.user_id),
            title: Set(request.title.clone()),
            description: Set(request.description.clone()),
            status: Set(request.status.as_i16()),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create evaluation request")?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<EvaluationRequest>, PortalError> {
        let models = evaluation_requests::Entity::find()
            .order_by_desc(evaluation_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list evaluation requests")?;
        models.into_iter().map(request_from_model).collect()
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<EvaluationRequest>, PortalError> {
        let models = evaluation_requests::Entity::find()
            .filter(evaluation_requests::Column::UserId.eq(user_id))
            .order_by_desc(evaluation_requests::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list evaluation requests by user")?;
        models.into_iter().map(request_from_model).collect()
    }

    async fn update_status(&self, id: Uuid, status: RequestStatus) -> Result<bool, PortalError> {
        let result = evaluation_requests::Entity::update_many()
            .col_expr(
                evaluation_requests::Column::Status,
                Expr::value(status.as_i16()),
            )
            .col_expr(
                evaluation_requests::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(evaluation_requests::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update evaluation request status")?;
        Ok(result.rows_affected > 0)
    }
}

fn request_from_model(model: evaluation_requests::Model) -> Result<EvaluationRequest, PortalError> {
    let status = RequestStatus::from_i16(model.status)
        .ok_or_else(|| anyhow!("unknown status {} on request {}", model.status, model.id))?;
    Ok(EvaluationRequest {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
