use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChartOfAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChartOfAccounts::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChartOfAccounts::AccountCode)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ChartOfAccounts::AccountName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChartOfAccounts::AccountType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ChartOfAccounts::Description).text().null())
                    .col(
                        ColumnDef::new(ChartOfAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ChartOfAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalEntries::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::TransactionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::TransactionDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JournalEntries::AccountId).uuid().not_null())
                    .col(ColumnDef::new(JournalEntries::Debit).decimal().null())
                    .col(ColumnDef::new(JournalEntries::Credit).decimal().null())
                    .col(
                        ColumnDef::new(JournalEntries::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::ReferenceType)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(JournalEntries::ReferenceId).uuid().null())
                    .col(ColumnDef::new(JournalEntries::CreatedBy).uuid().null())
                    .col(
                        ColumnDef::new(JournalEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalEntries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_entries_account")
                            .from(JournalEntries::Table, JournalEntries::AccountId)
                            .to(ChartOfAccounts::Table, ChartOfAccounts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JournalEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChartOfAccounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ChartOfAccounts {
    Table,
    Id,
    AccountCode,
    AccountName,
    AccountType,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum JournalEntries {
    Table,
    Id,
    TransactionId,
    TransactionDate,
    AccountId,
    Debit,
    Credit,
    Description,
    ReferenceType,
    ReferenceId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
