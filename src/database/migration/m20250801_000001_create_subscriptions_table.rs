use super::Subscriptions;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::ServiceName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::Price).integer().not_null())
                    .col(ColumnDef::new(Subscriptions::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::StartMonth)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::EndMonth).integer().null())
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on user_id for the exact-match filter
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_user_id")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        // Index on start_month for the period overlap predicate
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_start_month")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::StartMonth)
                    .to_owned(),
            )
            .await?;

        // Index on deleted_at: every read path filters on it
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_deleted_at")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::DeletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}
