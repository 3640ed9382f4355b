//! Migration to create the people table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(People::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(People::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(People::Name).text().not_null())
                    .col(ColumnDef::new(People::Position).text().null())
                    .col(ColumnDef::new(People::CompanyId).uuid().null())
                    .col(ColumnDef::new(People::Email).text().null())
                    .col(ColumnDef::new(People::Phone).text().null())
                    .col(ColumnDef::new(People::Department).text().null())
                    .col(ColumnDef::new(People::Location).text().null())
                    .col(
                        ColumnDef::new(People::AvatarColor)
                            .text()
                            .not_null()
                            .default("blue"),
                    )
                    .col(
                        ColumnDef::new(People::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(People::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_people_company_id")
                            .from(People::Table, People::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_people_company_id")
                    .table(People::Table)
                    .col(People::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_people_company_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(People::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum People {
    Table,
    Id,
    Name,
    Position,
    CompanyId,
    Email,
    Phone,
    Department,
    Location,
    AvatarColor,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
}
