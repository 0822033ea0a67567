use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExchangeRates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExchangeRates::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRates::CurrencyCode)
                            .string_len(3)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRates::CurrencyName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExchangeRates::Rate).decimal().not_null())
                    .col(
                        ColumnDef::new(ExchangeRates::EffectiveDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRates::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExchangeRates::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ExchangeRates {
    Table,
    Id,
    CurrencyCode,
    CurrencyName,
    Rate,
    EffectiveDate,
    CreatedAt,
    UpdatedAt,
}
