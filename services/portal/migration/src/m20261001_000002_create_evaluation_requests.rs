use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EvaluationRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EvaluationRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EvaluationRequests::UserId).uuid())
                    .col(ColumnDef::new(EvaluationRequests::Title).string().not_null())
                    .col(
                        ColumnDef::new(EvaluationRequests::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::Status)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EvaluationRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // No ON DELETE action: account deletion detaches requests explicitly.
                    .foreign_key(
                        ForeignKey::create()
                            .from(EvaluationRequests::Table, EvaluationRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(EvaluationRequests::Table)
                    .col(EvaluationRequests::UserId)
                    .name("idx_evaluation_requests_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EvaluationRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EvaluationRequests {
    Table,
    Id,
    UserId,
    Title,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
