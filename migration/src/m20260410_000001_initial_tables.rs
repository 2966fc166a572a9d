//! Initial schema: origins and registrations.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Origin::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Origin::Code)
                            .string_len(7)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Origin::Title).string().not_null())
                    .col(ColumnDef::new(Origin::Description).text().null())
                    .col(
                        ColumnDef::new(Origin::TrackRegistrations)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Origin::QuerystringParameters)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(Origin::RedirectTo).text().null())
                    .col(
                        ColumnDef::new(Origin::NumberOfRegistrations)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Origin::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_origins_created_at")
                    .table(Origin::Table)
                    .col(Origin::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registration::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Registration::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Registration::OriginCode)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Registration::Created)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One registration per user, enforced by the store
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_registrations_user_id")
                    .table(Registration::Table)
                    .col(Registration::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_registrations_origin_code")
                    .table(Registration::Table)
                    .col(Registration::OriginCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_registrations_origin_code")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_registrations_user_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_origins_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Origin::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Origin {
    #[sea_orm(iden = "origins")]
    Table,
    Code,
    Title,
    Description,
    TrackRegistrations,
    QuerystringParameters,
    RedirectTo,
    NumberOfRegistrations,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Registration {
    #[sea_orm(iden = "registrations")]
    Table,
    Id,
    UserId,
    OriginCode,
    Created,
}
