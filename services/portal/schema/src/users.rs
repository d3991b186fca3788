use sea_orm::entity::prelude::*;

/// Portal account.
///
/// `reset_token` and `reset_token_expiry` are set and cleared together
/// (enforced by a table CHECK constraint).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub document: String,
    pub name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub role: i16,
    #[sea_orm(unique)]
    pub reset_token: Option<String>,
    pub reset_token_expiry: Option<chrono::DateTime<chrono::Utc>>,
    pub first_access: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::evaluation_requests::Entity")]
    EvaluationRequests,
}

impl Related<super::evaluation_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvaluationRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
