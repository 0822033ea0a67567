use sea_orm_migration::prelude::*;

use super::m20240301_000002_create_finance_tables::JournalEntries;
use super::m20240301_000003_create_procurement_tables::{GoodsReceipts, Payables};
use super::m20240301_000004_create_project_tables::{ActivityLogs, ProjectMilestones};
use super::m20240301_000005_create_catalog_tables::BomLines;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_transaction")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::TransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_entries_account")
                    .table(JournalEntries::Table)
                    .col(JournalEntries::AccountId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_goods_receipts_po")
                    .table(GoodsReceipts::Table)
                    .col(GoodsReceipts::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payables_po")
                    .table(Payables::Table)
                    .col(Payables::PurchaseOrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_milestones_project")
                    .table(ProjectMilestones::Table)
                    .col(ProjectMilestones::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_logs_project")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bom_lines_project")
                    .table(BomLines::Table)
                    .col(BomLines::ProjectId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_journal_entries_transaction")
                    .table(JournalEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_journal_entries_account")
                    .table(JournalEntries::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_goods_receipts_po")
                    .table(GoodsReceipts::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_payables_po")
                    .table(Payables::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_milestones_project")
                    .table(ProjectMilestones::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_activity_logs_project")
                    .table(ActivityLogs::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_bom_lines_project")
                    .table(BomLines::Table)
                    .to_owned(),
            )
            .await
    }
}
