use crate::{
    db::DbPool,
    entities::goods_receipt::{self, Entity as GoodsReceiptEntity},
    entities::payable::{self, Entity as PayableEntity, MatchingStatus, PayableStatus},
    entities::purchase_order::Entity as PurchaseOrderEntity,
    entities::vendor::Entity as VendorEntity,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Amount tolerance used by the three-way match
const MATCH_TOLERANCE: Decimal = dec!(0.01);

#[derive(Debug, Clone)]
pub struct CreatePayableInput {
    pub invoice_number: String,
    pub vendor_id: Uuid,
    pub purchase_order_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PayableFilter {
    pub vendor_id: Option<Uuid>,
    pub status: Option<PayableStatus>,
}

/// Service managing vendor invoices through their payment lifecycle
#[derive(Clone)]
pub struct PayableService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl PayableService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Records a vendor invoice in DRAFT with a computed matching status.
    #[instrument(skip(self, input))]
    pub async fn create_payable(&self, input: CreatePayableInput) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Invoice amount must be positive".into(),
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

        let duplicate = PayableEntity::find()
            .filter(payable::Column::VendorId.eq(input.vendor_id))
            .filter(payable::Column::InvoiceNumber.eq(input.invoice_number.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Invoice '{}' already exists for this vendor",
                input.invoice_number
            )));
        }

        let matching_status = self
            .compute_matching(db, input.purchase_order_id, input.amount)
            .await?;

        let now = Utc::now();
        let model = payable::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_number: Set(input.invoice_number),
            vendor_id: Set(input.vendor_id),
            purchase_order_id: Set(input.purchase_order_id),
            invoice_date: Set(input.invoice_date),
            due_date: Set(input.due_date),
            amount: Set(input.amount),
            amount_paid: Set(Decimal::ZERO),
            status: Set(PayableStatus::Draft),
            matching_status: Set(matching_status),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::PayableCreated(created.id))
            .await;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_payable(
        &self,
        payable_id: &Uuid,
    ) -> Result<Option<payable::Model>, ServiceError> {
        PayableEntity::find_by_id(*payable_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_payables(
        &self,
        filter: PayableFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<payable::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(vendor_id) = filter.vendor_id {
            condition = condition.add(payable::Column::VendorId.eq(vendor_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(payable::Column::Status.eq(status));
        }

        let paginator = PayableEntity::find()
            .filter(condition)
            .order_by_desc(payable::Column::InvoiceDate)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let payables = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((payables, total))
    }

    /// Moves a payable along its lifecycle, rejecting invalid transitions.
    #[instrument(skip(self))]
    pub async fn transition_status(
        &self,
        payable_id: Uuid,
        next: PayableStatus,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let mut model = PayableEntity::find_by_id(payable_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Payable {} not found", payable_id)))?;

        let current = model.status;
        if !current.can_transition_to(next) {
            return Err(ServiceError::InvalidStatus(format!(
                "cannot move payable from {} to {}",
                current, next
            )));
        }

        model.status = next;
        model.updated_at = Utc::now();
        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::PayableStatusChanged {
                payable_id,
                old_status: current.to_string(),
                new_status: next.to_string(),
            })
            .await;

        Ok(())
    }

    /// Adds a payment against an approved payable. The running total moves
    /// the status to PARTIALLY_PAID or PAID; overpayment is rejected.
    #[instrument(skip(self))]
    pub async fn record_payment(
        &self,
        payable_id: Uuid,
        amount: Decimal,
    ) -> Result<PayableStatus, ServiceError> {
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Payment amount must be positive".into(),
            ));
        }

        let db = self.db_pool.as_ref();
        let mut model = PayableEntity::find_by_id(payable_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Payable {} not found", payable_id)))?;

        if !matches!(
            model.status,
            PayableStatus::Approved | PayableStatus::PartiallyPaid
        ) {
            return Err(ServiceError::InvalidStatus(format!(
                "payments are only accepted for approved payables, current status is {}",
                model.status
            )));
        }

        let new_total = model.amount_paid + amount;
        if new_total > model.amount {
            return Err(ServiceError::ValidationError(format!(
                "payment of {} would exceed the invoice amount {}",
                amount, model.amount
            )));
        }

        let old_status = model.status;
        let new_status = if new_total == model.amount {
            PayableStatus::Paid
        } else {
            PayableStatus::PartiallyPaid
        };

        model.amount_paid = new_total;
        model.status = new_status;
        model.updated_at = Utc::now();
        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::PaymentRecorded { payable_id, amount })
            .await;
        if old_status != new_status {
            self.event_sender
                .send_or_log(Event::PayableStatusChanged {
                    payable_id,
                    old_status: old_status.to_string(),
                    new_status: new_status.to_string(),
                })
                .await;
        }

        Ok(new_status)
    }

    /// Re-derives matching for every payable linked to a purchase order.
    /// Called after a goods receipt lands.
    #[instrument(skip(self))]
    pub async fn refresh_matching_for_po(&self, purchase_order_id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let linked = PayableEntity::find()
            .filter(payable::Column::PurchaseOrderId.eq(purchase_order_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        for mut model in linked {
            let status = self
                .compute_matching(db, Some(purchase_order_id), model.amount)
                .await?;
            if status != model.matching_status {
                model.matching_status = status;
                model.updated_at = Utc::now();
                model
                    .into_active_model()
                    .update(db)
                    .await
                    .map_err(ServiceError::db_error)?;
            }
        }

        Ok(())
    }

    /// Three-way match: invoice amount against the PO total and the value
    /// received so far. Over-billing never matches; receipts covering the
    /// invoice amount within tolerance match fully.
    async fn compute_matching<C: ConnectionTrait>(
        &self,
        db: &C,
        purchase_order_id: Option<Uuid>,
        amount: Decimal,
    ) -> Result<MatchingStatus, ServiceError> {
        let Some(po_id) = purchase_order_id else {
            return Ok(MatchingStatus::NotMatched);
        };

        let po = PurchaseOrderEntity::find_by_id(po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Purchase order {} not found", po_id))
            })?;

        if amount > po.total_amount + MATCH_TOLERANCE {
            return Ok(MatchingStatus::NotMatched);
        }

        let receipts = GoodsReceiptEntity::find()
            .filter(goods_receipt::Column::PurchaseOrderId.eq(po_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let received: Decimal = receipts.iter().map(|r| r.received_amount).sum();

        if received + MATCH_TOLERANCE >= amount && received > Decimal::ZERO {
            Ok(MatchingStatus::Matched)
        } else if received > Decimal::ZERO {
            Ok(MatchingStatus::PartiallyMatched)
        } else {
            Ok(MatchingStatus::NotMatched)
        }
    }
}
