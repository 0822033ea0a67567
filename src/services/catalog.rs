use crate::{
    db::DbPool,
    entities::material::{self, Entity as MaterialEntity},
    entities::service_item::{self, Entity as ServiceItemEntity},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Shared input shape for materials and service items
#[derive(Debug, Clone)]
pub struct CreateCatalogItemInput {
    pub code: String,
    pub name: String,
    pub unit: String,
    pub unit_price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCatalogItemInput {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Service managing the material and service catalogs
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn validate(input: &CreateCatalogItemInput) -> Result<(), ServiceError> {
        if input.unit_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Unit price cannot be negative".into(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_material(
        &self,
        input: CreateCatalogItemInput,
    ) -> Result<Uuid, ServiceError> {
        Self::validate(&input)?;
        let db = self.db_pool.as_ref();

        let duplicate = MaterialEntity::find()
            .filter(material::Column::Code.eq(input.code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Material code '{}' already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let model = material::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            unit: Set(input.unit),
            unit_price: Set(input.unit_price),
            category: Set(input.category),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_material(
        &self,
        material_id: &Uuid,
    ) -> Result<Option<material::Model>, ServiceError> {
        MaterialEntity::find_by_id(*material_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_materials(
        &self,
        filter: CatalogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<material::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(category) = filter.category {
            condition = condition.add(material::Column::Category.eq(category));
        }
        if let Some(term) = filter.search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim().to_lowercase());
            condition = condition.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(material::Column::Name))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(material::Column::Code))).like(pattern)),
            );
        }

        let paginator = MaterialEntity::find()
            .filter(condition)
            .order_by_asc(material::Column::Code)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let materials = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((materials, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_material(
        &self,
        material_id: Uuid,
        input: UpdateCatalogItemInput,
    ) -> Result<(), ServiceError> {
        if let Some(price) = input.unit_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Unit price cannot be negative".into(),
                ));
            }
        }

        let db = self.db_pool.as_ref();
        let mut model = MaterialEntity::find_by_id(material_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Material {} not found", material_id))
            })?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(unit) = input.unit {
            model.unit = unit;
        }
        if let Some(price) = input.unit_price {
            model.unit_price = price;
        }
        if let Some(category) = input.category {
            model.category = Some(category);
        }
        model.updated_at = Utc::now();

        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }

    /// Deletes a material; blocked while BoM lines reference it.
    #[instrument(skip(self))]
    pub async fn delete_material(&self, material_id: Uuid) -> Result<(), ServiceError> {
        use crate::entities::bom_line;

        let db = self.db_pool.as_ref();
        let existing = MaterialEntity::find_by_id(material_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Material {} not found",
                material_id
            )));
        }

        let referencing = bom_line::Entity::find()
            .filter(bom_line::Column::MaterialId.eq(material_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        if referencing > 0 {
            return Err(ServiceError::BadRequest(
                "Material is referenced by BoM lines and cannot be deleted".into(),
            ));
        }

        MaterialEntity::delete_by_id(material_id)
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_service_item(
        &self,
        input: CreateCatalogItemInput,
    ) -> Result<Uuid, ServiceError> {
        Self::validate(&input)?;
        let db = self.db_pool.as_ref();

        let duplicate = ServiceItemEntity::find()
            .filter(service_item::Column::Code.eq(input.code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Service code '{}' already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let model = service_item::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(input.code),
            name: Set(input.name),
            unit: Set(input.unit),
            unit_price: Set(input.unit_price),
            category: Set(input.category),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_service_item(
        &self,
        item_id: &Uuid,
    ) -> Result<Option<service_item::Model>, ServiceError> {
        ServiceItemEntity::find_by_id(*item_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, input))]
    pub async fn update_service_item(
        &self,
        item_id: Uuid,
        input: UpdateCatalogItemInput,
    ) -> Result<(), ServiceError> {
        if let Some(price) = input.unit_price {
            if price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(
                    "Unit price cannot be negative".into(),
                ));
            }
        }

        let db = self.db_pool.as_ref();
        let mut model = ServiceItemEntity::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Service item {} not found", item_id))
            })?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(unit) = input.unit {
            model.unit = unit;
        }
        if let Some(price) = input.unit_price {
            model.unit_price = price;
        }
        if let Some(category) = input.category {
            model.category = Some(category);
        }
        model.updated_at = Utc::now();

        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_service_items(
        &self,
        filter: CatalogFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<service_item::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(category) = filter.category {
            condition = condition.add(service_item::Column::Category.eq(category));
        }
        if let Some(term) = filter.search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim().to_lowercase());
            condition = condition
                .add(Expr::expr(Func::lower(Expr::col(service_item::Column::Name))).like(pattern));
        }

        let paginator = ServiceItemEntity::find()
            .filter(condition)
            .order_by_asc(service_item::Column::Code)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((items, total))
    }
}
