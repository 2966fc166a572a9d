//! Origin groups: administrative grouping over origins.
//!
//! Adds the origin_groups table and a nullable group reference on origins.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OriginGroup::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OriginGroup::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OriginGroup::Title).string_len(50).not_null())
                    .col(ColumnDef::new(OriginGroup::Description).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Origin::Table)
                    .add_column(
                        ColumnDef::new(Origin::OriginGroupId)
                            .big_integer()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_origins_origin_group_id")
                    .table(Origin::Table)
                    .col(Origin::OriginGroupId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_origins_origin_group_id").to_owned())
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Origin::Table)
                    .drop_column(Origin::OriginGroupId)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(OriginGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OriginGroup {
    #[sea_orm(iden = "origin_groups")]
    Table,
    Id,
    Title,
    Description,
}

#[derive(DeriveIden)]
enum Origin {
    #[sea_orm(iden = "origins")]
    Table,
    OriginGroupId,
}
