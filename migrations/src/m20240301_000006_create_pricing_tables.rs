use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiscountPolicies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscountPolicies::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountPolicies::Role)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(DiscountPolicies::MaxDiscountPct)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountPolicies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountPolicies::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OverheadAllocations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OverheadAllocations::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OverheadAllocations::Category)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(OverheadAllocations::AllocationPct)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OverheadAllocations::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(OverheadAllocations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OverheadAllocations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentTerms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentTerms::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTerms::TermCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PaymentTerms::Description).string().not_null())
                    .col(ColumnDef::new(PaymentTerms::NetDays).integer().not_null())
                    .col(
                        ColumnDef::new(PaymentTerms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaymentTerms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PricingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingRules::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::Category)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PricingRules::MarkupPct).decimal().not_null())
                    .col(
                        ColumnDef::new(PricingRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PricingRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PricingRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PaymentTerms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OverheadAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DiscountPolicies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DiscountPolicies {
    Table,
    Id,
    Role,
    MaxDiscountPct,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum OverheadAllocations {
    Table,
    Id,
    Category,
    AllocationPct,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum PaymentTerms {
    Table,
    Id,
    TermCode,
    Description,
    NetDays,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum PricingRules {
    Table,
    Id,
    Category,
    MarkupPct,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
