use crate::{
    db::DbPool,
    entities::vendor::{self, Entity as VendorEntity, VendorClassification},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateVendorInput {
    pub vendor_name: String,
    pub classification: VendorClassification,
    pub is_preferred: bool,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateVendorInput {
    pub vendor_name: Option<String>,
    pub classification: Option<VendorClassification>,
    pub is_preferred: Option<bool>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    pub classification: Option<VendorClassification>,
    pub preferred_only: bool,
    pub search: Option<String>,
}

/// Service for managing vendors
#[derive(Clone)]
pub struct VendorService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl VendorService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_vendor(&self, input: CreateVendorInput) -> Result<Uuid, ServiceError> {
        let now = Utc::now();
        let model = vendor::ActiveModel {
            id: Set(Uuid::new_v4()),
            vendor_name: Set(input.vendor_name),
            classification: Set(input.classification),
            is_preferred: Set(input.is_preferred),
            contact_name: Set(input.contact_name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model
            .insert(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::VendorCreated(created.id))
            .await;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_vendor(&self, vendor_id: &Uuid) -> Result<Option<vendor::Model>, ServiceError> {
        VendorEntity::find_by_id(*vendor_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_vendors(
        &self,
        filter: VendorFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<vendor::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(classification) = filter.classification {
            condition = condition.add(vendor::Column::Classification.eq(classification));
        }
        if filter.preferred_only {
            condition = condition.add(vendor::Column::IsPreferred.eq(true));
        }
        if let Some(term) = filter.search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim().to_lowercase());
            condition = condition.add(
                Expr::expr(Func::lower(Expr::col(vendor::Column::VendorName))).like(pattern),
            );
        }

        let paginator = VendorEntity::find()
            .filter(condition)
            .order_by_asc(vendor::Column::VendorName)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let vendors = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((vendors, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_vendor(
        &self,
        vendor_id: Uuid,
        input: UpdateVendorInput,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let mut model = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Vendor {} not found", vendor_id)))?;

        if let Some(name) = input.vendor_name {
            model.vendor_name = name;
        }
        if let Some(classification) = input.classification {
            model.classification = classification;
        }
        if let Some(preferred) = input.is_preferred {
            model.is_preferred = preferred;
        }
        if let Some(contact) = input.contact_name {
            model.contact_name = Some(contact);
        }
        if let Some(email) = input.email {
            model.email = Some(email);
        }
        if let Some(phone) = input.phone {
            model.phone = Some(phone);
        }
        if let Some(address) = input.address {
            model.address = Some(address);
        }
        model.updated_at = Utc::now();

        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::VendorUpdated(vendor_id))
            .await;

        Ok(())
    }

    /// Deletes a vendor; blocked while purchase orders or payables
    /// reference it.
    #[instrument(skip(self))]
    pub async fn delete_vendor(&self, vendor_id: Uuid) -> Result<(), ServiceError> {
        use crate::entities::{payable, purchase_order};

        let db = self.db_pool.as_ref();
        let existing = VendorEntity::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Vendor {} not found",
                vendor_id
            )));
        }

        let po_count = purchase_order::Entity::find()
            .filter(purchase_order::Column::VendorId.eq(vendor_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        let payable_count = payable::Entity::find()
            .filter(payable::Column::VendorId.eq(vendor_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        if po_count > 0 || payable_count > 0 {
            return Err(ServiceError::BadRequest(
                "Vendor has purchase orders or payables and cannot be deleted".into(),
            ));
        }

        VendorEntity::delete_by_id(vendor_id)
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }
}
