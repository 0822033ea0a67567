use crate::{
    db::DbPool,
    entities::goods_receipt::{self, Entity as GoodsReceiptEntity},
    entities::purchase_order::{self, Entity as PurchaseOrderEntity, PurchaseOrderStatus},
    entities::vendor::Entity as VendorEntity,
    errors::ServiceError,
    events::{Event, EventSender},
    services::payables::PayableService,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    pub po_number: String,
    pub vendor_id: Uuid,
    pub order_date: NaiveDate,
    pub total_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateGoodsReceiptInput {
    pub gr_number: String,
    pub purchase_order_id: Uuid,
    pub received_date: NaiveDate,
    pub received_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PurchaseOrderFilter {
    pub vendor_id: Option<Uuid>,
    pub status: Option<PurchaseOrderStatus>,
}

/// Service managing purchase orders and goods receipts
#[derive(Clone)]
pub struct ProcurementService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    payables: Arc<PayableService>,
}

impl ProcurementService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        payables: Arc<PayableService>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            payables,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        if input.total_amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Purchase order total must be positive".into(),
            ));
        }

        let vendor = VendorEntity::find_by_id(input.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if vendor.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Vendor {} not found",
                input.vendor_id
            )));
        }

        let duplicate = PurchaseOrderEntity::find()
            .filter(purchase_order::Column::PoNumber.eq(input.po_number.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Purchase order '{}' already exists",
                input.po_number
            )));
        }

        let now = Utc::now();
        let model = purchase_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            po_number: Set(input.po_number),
            vendor_id: Set(input.vendor_id),
            order_date: Set(input.order_date),
            total_amount: Set(input.total_amount),
            status: Set(PurchaseOrderStatus::Draft),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::PurchaseOrderCreated(created.id))
            .await;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_purchase_order(
        &self,
        po_id: &Uuid,
    ) -> Result<Option<purchase_order::Model>, ServiceError> {
        PurchaseOrderEntity::find_by_id(*po_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        filter: PurchaseOrderFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(vendor_id) = filter.vendor_id {
            condition = condition.add(purchase_order::Column::VendorId.eq(vendor_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(purchase_order::Column::Status.eq(status));
        }

        let paginator = PurchaseOrderEntity::find()
            .filter(condition)
            .order_by_desc(purchase_order::Column::OrderDate)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let orders = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((orders, total))
    }

    /// Updates the PO status along Draft → Issued → Closed, allowing
    /// cancellation before closure.
    #[instrument(skip(self))]
    pub async fn set_purchase_order_status(
        &self,
        po_id: Uuid,
        next: PurchaseOrderStatus,
    ) -> Result<(), ServiceError> {
        use PurchaseOrderStatus::*;

        let db = self.db_pool.as_ref();
        let mut model = PurchaseOrderEntity::find_by_id(po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_id))
            })?;

        let allowed = matches!(
            (model.status, next),
            (Draft, Issued) | (Issued, Closed) | (Draft, Cancelled) | (Issued, Cancelled)
        );
        if !allowed {
            return Err(ServiceError::InvalidStatus(format!(
                "cannot move purchase order from {:?} to {:?}",
                model.status, next
            )));
        }

        model.status = next;
        model.updated_at = Utc::now();
        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }

    /// Records a goods receipt against an issued PO and refreshes the
    /// matching status of linked payables.
    #[instrument(skip(self, input))]
    pub async fn record_goods_receipt(
        &self,
        input: CreateGoodsReceiptInput,
    ) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        if input.received_amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Received amount must be positive".into(),
            ));
        }

        let po = PurchaseOrderEntity::find_by_id(input.purchase_order_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Purchase order {} not found",
                    input.purchase_order_id
                ))
            })?;

        if matches!(
            po.status,
            PurchaseOrderStatus::Cancelled | PurchaseOrderStatus::Closed
        ) {
            return Err(ServiceError::InvalidOperation(format!(
                "cannot receive goods against a {:?} purchase order",
                po.status
            )));
        }

        let duplicate = GoodsReceiptEntity::find()
            .filter(goods_receipt::Column::GrNumber.eq(input.gr_number.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Goods receipt '{}' already exists",
                input.gr_number
            )));
        }

        let now = Utc::now();
        let model = goods_receipt::ActiveModel {
            id: Set(Uuid::new_v4()),
            gr_number: Set(input.gr_number),
            purchase_order_id: Set(input.purchase_order_id),
            received_date: Set(input.received_date),
            received_amount: Set(input.received_amount),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.payables
            .refresh_matching_for_po(input.purchase_order_id)
            .await?;

        self.event_sender
            .send_or_log(Event::GoodsReceiptRecorded {
                receipt_id: created.id,
                purchase_order_id: input.purchase_order_id,
            })
            .await;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_goods_receipts(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<Vec<goods_receipt::Model>, ServiceError> {
        GoodsReceiptEntity::find()
            .filter(goods_receipt::Column::PurchaseOrderId.eq(purchase_order_id))
            .order_by_asc(goods_receipt::Column::ReceivedDate)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }
}
