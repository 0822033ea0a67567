use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Vendors::VendorName).string().not_null())
                    .col(
                        ColumnDef::new(Vendors::Classification)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vendors::IsPreferred)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Vendors::ContactName).string().null())
                    .col(ColumnDef::new(Vendors::Email).string().null())
                    .col(ColumnDef::new(Vendors::Phone).string().null())
                    .col(ColumnDef::new(Vendors::Address).text().null())
                    .col(
                        ColumnDef::new(Vendors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Vendors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::PoNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::VendorId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrders::OrderDate).date().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::TotalAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::Notes).text().null())
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_orders_vendor")
                            .from(PurchaseOrders::Table, PurchaseOrders::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoodsReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GoodsReceipts::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoodsReceipts::GrNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(GoodsReceipts::PurchaseOrderId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoodsReceipts::ReceivedDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoodsReceipts::ReceivedAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GoodsReceipts::Notes).text().null())
                    .col(
                        ColumnDef::new(GoodsReceipts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GoodsReceipts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goods_receipts_po")
                            .from(GoodsReceipts::Table, GoodsReceipts::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Payables::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payables::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Payables::InvoiceNumber).string().not_null())
                    .col(ColumnDef::new(Payables::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Payables::PurchaseOrderId).uuid().null())
                    .col(ColumnDef::new(Payables::InvoiceDate).date().not_null())
                    .col(ColumnDef::new(Payables::DueDate).date().not_null())
                    .col(ColumnDef::new(Payables::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(Payables::AmountPaid)
                            .decimal()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Payables::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Payables::MatchingStatus)
                            .string_len(24)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payables::Description).text().null())
                    .col(
                        ColumnDef::new(Payables::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payables::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payables_vendor")
                            .from(Payables::Table, Payables::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payables_po")
                            .from(Payables::Table, Payables::PurchaseOrderId)
                            .to(PurchaseOrders::Table, PurchaseOrders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // One invoice number per vendor
        manager
            .create_index(
                Index::create()
                    .name("idx_payables_vendor_invoice")
                    .table(Payables::Table)
                    .col(Payables::VendorId)
                    .col(Payables::InvoiceNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GoodsReceipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Vendors {
    Table,
    Id,
    VendorName,
    Classification,
    IsPreferred,
    ContactName,
    Email,
    Phone,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum PurchaseOrders {
    Table,
    Id,
    PoNumber,
    VendorId,
    OrderDate,
    TotalAmount,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum GoodsReceipts {
    Table,
    Id,
    GrNumber,
    PurchaseOrderId,
    ReceivedDate,
    ReceivedAmount,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Payables {
    Table,
    Id,
    InvoiceNumber,
    VendorId,
    PurchaseOrderId,
    InvoiceDate,
    DueDate,
    Amount,
    AmountPaid,
    Status,
    MatchingStatus,
    Description,
    CreatedAt,
    UpdatedAt,
}
