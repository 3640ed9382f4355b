//! Migration to create the industries table.
//!
//! Companies reference industries by name, not by id; there is deliberately
//! no foreign key from companies to this table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Industries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Industries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Industries::Name).text().not_null())
                    .col(ColumnDef::new(Industries::Description).text().null())
                    .col(
                        ColumnDef::new(Industries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Industries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_industries_name")
                    .table(Industries::Table)
                    .col(Industries::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_industries_name").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Industries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Industries {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}
