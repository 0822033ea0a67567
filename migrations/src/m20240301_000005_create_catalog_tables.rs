use sea_orm_migration::prelude::*;

use super::m20240301_000004_create_project_tables::Projects;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Materials::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Materials::Id).uuid().primary_key().not_null())
                    .col(
                        ColumnDef::new(Materials::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Materials::Name).string().not_null())
                    .col(ColumnDef::new(Materials::Unit).string().not_null())
                    .col(ColumnDef::new(Materials::UnitPrice).decimal().not_null())
                    .col(ColumnDef::new(Materials::Category).string().null())
                    .col(
                        ColumnDef::new(Materials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Materials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceItems::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ServiceItems::Name).string().not_null())
                    .col(ColumnDef::new(ServiceItems::Unit).string().not_null())
                    .col(ColumnDef::new(ServiceItems::UnitPrice).decimal().not_null())
                    .col(ColumnDef::new(ServiceItems::Category).string().null())
                    .col(
                        ColumnDef::new(ServiceItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ServiceItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BomLines::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BomLines::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(BomLines::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(BomLines::MaterialId).uuid().null())
                    .col(ColumnDef::new(BomLines::ServiceItemId).uuid().null())
                    .col(ColumnDef::new(BomLines::Quantity).decimal().not_null())
                    .col(ColumnDef::new(BomLines::UnitPrice).decimal().not_null())
                    .col(
                        ColumnDef::new(BomLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BomLines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bom_lines_project")
                            .from(BomLines::Table, BomLines::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bom_lines_material")
                            .from(BomLines::Table, BomLines::MaterialId)
                            .to(Materials::Table, Materials::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bom_lines_service_item")
                            .from(BomLines::Table, BomLines::ServiceItemId)
                            .to(ServiceItems::Table, ServiceItems::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BomLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Materials::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Materials {
    Table,
    Id,
    Code,
    Name,
    Unit,
    UnitPrice,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ServiceItems {
    Table,
    Id,
    Code,
    Name,
    Unit,
    UnitPrice,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum BomLines {
    Table,
    Id,
    ProjectId,
    MaterialId,
    ServiceItemId,
    Quantity,
    UnitPrice,
    CreatedAt,
    UpdatedAt,
}
