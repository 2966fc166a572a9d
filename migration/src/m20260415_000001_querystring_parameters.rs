//! Querystring parameter counters.
//!
//! One row per (identifier, value, origin) triple, created lazily on the
//! first registration that carries the tracked parameter. The unique index
//! is what the insert-or-increment upsert conflicts against.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuerystringParameter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuerystringParameter::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuerystringParameter::Identifier)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuerystringParameter::Value)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuerystringParameter::OriginCode)
                            .string_len(7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QuerystringParameter::NumberOfRegistrations)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qs_params_identifier_value_origin")
                    .table(QuerystringParameter::Table)
                    .col(QuerystringParameter::Identifier)
                    .col(QuerystringParameter::Value)
                    .col(QuerystringParameter::OriginCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qs_params_identifier")
                    .table(QuerystringParameter::Table)
                    .col(QuerystringParameter::Identifier)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qs_params_origin_code")
                    .table(QuerystringParameter::Table)
                    .col(QuerystringParameter::OriginCode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_qs_params_origin_code").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_qs_params_identifier").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_qs_params_identifier_value_origin")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(QuerystringParameter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum QuerystringParameter {
    #[sea_orm(iden = "querystring_parameters")]
    Table,
    Id,
    Identifier,
    Value,
    OriginCode,
    NumberOfRegistrations,
}
