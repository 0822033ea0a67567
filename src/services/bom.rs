use crate::{
    db::DbPool,
    entities::bom_line::{self, Entity as BomLineEntity},
    entities::material::Entity as MaterialEntity,
    entities::project::Entity as ProjectEntity,
    entities::service_item::Entity as ServiceItemEntity,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// One BoM line to write. Exactly one of material/service reference.
#[derive(Debug, Clone)]
pub struct BomLineInput {
    pub material_id: Option<Uuid>,
    pub service_item_id: Option<Uuid>,
    pub quantity: Decimal,
}

/// A project's bill of materials with its estimated total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomView {
    pub project_id: Uuid,
    pub lines: Vec<bom_line::Model>,
    pub total: Decimal,
}

/// Service managing project bills of materials
#[derive(Clone)]
pub struct BomService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl BomService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Replaces a project's BoM atomically: existing lines are deleted and
    /// the new set inserted in one transaction. Unit prices are snapshotted
    /// from the catalog at write time.
    #[instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn replace_bom(
        &self,
        project_id: Uuid,
        lines: Vec<BomLineInput>,
    ) -> Result<BomView, ServiceError> {
        let db = self.db_pool.as_ref();

        let project = ProjectEntity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if project.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }

        // Resolve unit prices and validate references up front
        let mut resolved = Vec::with_capacity(lines.len());
        for (index, line) in lines.into_iter().enumerate() {
            if line.quantity <= Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Line {} quantity must be positive",
                    index + 1
                )));
            }
            let unit_price = match (line.material_id, line.service_item_id) {
                (Some(material_id), None) => MaterialEntity::find_by_id(material_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .map(|m| m.unit_price)
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Material {} not found", material_id))
                    })?,
                (None, Some(service_item_id)) => ServiceItemEntity::find_by_id(service_item_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .map(|s| s.unit_price)
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "Service item {} not found",
                            service_item_id
                        ))
                    })?,
                _ => {
                    return Err(ServiceError::ValidationError(format!(
                        "Line {} must reference exactly one material or service item",
                        index + 1
                    )))
                }
            };
            resolved.push((line, unit_price));
        }

        let now = Utc::now();
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        BomLineEntity::delete_many()
            .filter(bom_line::Column::ProjectId.eq(project_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut inserted = Vec::with_capacity(resolved.len());
        for (line, unit_price) in resolved {
            let model = bom_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                project_id: Set(project_id),
                material_id: Set(line.material_id),
                service_item_id: Set(line.service_item_id),
                quantity: Set(line.quantity),
                unit_price: Set(unit_price),
                created_at: Set(now),
                updated_at: Set(now),
            };
            inserted.push(model.insert(&txn).await.map_err(ServiceError::db_error)?);
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::BomReplaced {
                project_id,
                line_count: inserted.len(),
            })
            .await;

        let total = inserted.iter().map(|l| l.line_total()).sum();
        Ok(BomView {
            project_id,
            lines: inserted,
            total,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_bom(&self, project_id: Uuid) -> Result<BomView, ServiceError> {
        let db = self.db_pool.as_ref();

        let project = ProjectEntity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if project.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }

        let lines = BomLineEntity::find()
            .filter(bom_line::Column::ProjectId.eq(project_id))
            .order_by_asc(bom_line::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let total = lines.iter().map(|l| l.line_total()).sum();
        Ok(BomView {
            project_id,
            lines,
            total,
        })
    }
}
