use crate::{
    db::DbPool,
    entities::discount_policy::{self, Entity as DiscountPolicyEntity},
    entities::overhead_allocation::{self, Entity as OverheadAllocationEntity},
    entities::payment_term::{self, Entity as PaymentTermEntity},
    entities::pricing_rule::{self, Entity as PricingRuleEntity},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Rejects percentages outside [0, 100].
fn validate_percentage(field: &str, value: Decimal) -> Result<(), ServiceError> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(ServiceError::ValidationError(format!(
            "{} must be between 0 and 100",
            field
        )));
    }
    Ok(())
}

/// Service managing the simple pricing rule tables: discount policies,
/// overhead allocations, payment terms, and markup rules.
#[derive(Clone)]
pub struct PricingService {
    db_pool: Arc<DbPool>,
}

impl PricingService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    // ---- Discount policies ----

    #[instrument(skip(self))]
    pub async fn upsert_discount_policy(
        &self,
        role: String,
        max_discount_pct: Decimal,
    ) -> Result<Uuid, ServiceError> {
        validate_percentage("max_discount_pct", max_discount_pct)?;
        let db = self.db_pool.as_ref();
        let now = Utc::now();

        if let Some(mut existing) = DiscountPolicyEntity::find()
            .filter(discount_policy::Column::Role.eq(role.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            let id = existing.id;
            existing.max_discount_pct = max_discount_pct;
            existing.updated_at = now;
            existing
                .into_active_model()
                .update(db)
                .await
                .map_err(ServiceError::db_error)?;
            return Ok(id);
        }

        let model = discount_policy::ActiveModel {
            id: Set(Uuid::new_v4()),
            role: Set(role),
            max_discount_pct: Set(max_discount_pct),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_discount_policies(
        &self,
    ) -> Result<Vec<discount_policy::Model>, ServiceError> {
        DiscountPolicyEntity::find()
            .order_by_asc(discount_policy::Column::Role)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_discount_policy(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = DiscountPolicyEntity::delete_by_id(id)
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Discount policy {} not found",
                id
            )));
        }
        Ok(())
    }

    // ---- Overhead allocations ----

    #[instrument(skip(self))]
    pub async fn upsert_overhead_allocation(
        &self,
        category: String,
        allocation_pct: Decimal,
        description: Option<String>,
    ) -> Result<Uuid, ServiceError> {
        validate_percentage("allocation_pct", allocation_pct)?;
        let db = self.db_pool.as_ref();
        let now = Utc::now();

        if let Some(mut existing) = OverheadAllocationEntity::find()
            .filter(overhead_allocation::Column::Category.eq(category.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            let id = existing.id;
            existing.allocation_pct = allocation_pct;
            if let Some(description) = description {
                existing.description = Some(description);
            }
            existing.updated_at = now;
            existing
                .into_active_model()
                .update(db)
                .await
                .map_err(ServiceError::db_error)?;
            return Ok(id);
        }

        let model = overhead_allocation::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(category),
            allocation_pct: Set(allocation_pct),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_overhead_allocations(
        &self,
    ) -> Result<Vec<overhead_allocation::Model>, ServiceError> {
        OverheadAllocationEntity::find()
            .order_by_asc(overhead_allocation::Column::Category)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    // ---- Payment terms ----

    #[instrument(skip(self))]
    pub async fn create_payment_term(
        &self,
        term_code: String,
        description: String,
        net_days: i32,
    ) -> Result<Uuid, ServiceError> {
        if net_days < 0 {
            return Err(ServiceError::ValidationError(
                "net_days cannot be negative".into(),
            ));
        }

        let db = self.db_pool.as_ref();
        let duplicate = PaymentTermEntity::find()
            .filter(payment_term::Column::TermCode.eq(term_code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Payment term '{}' already exists",
                term_code
            )));
        }

        let now = Utc::now();
        let model = payment_term::ActiveModel {
            id: Set(Uuid::new_v4()),
            term_code: Set(term_code),
            description: Set(description),
            net_days: Set(net_days),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_payment_terms(&self) -> Result<Vec<payment_term::Model>, ServiceError> {
        PaymentTermEntity::find()
            .order_by_asc(payment_term::Column::NetDays)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn delete_payment_term(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = PaymentTermEntity::delete_by_id(id)
            .exec(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Payment term {} not found",
                id
            )));
        }
        Ok(())
    }

    // ---- Pricing rules ----

    #[instrument(skip(self))]
    pub async fn upsert_pricing_rule(
        &self,
        category: String,
        markup_pct: Decimal,
        is_active: bool,
    ) -> Result<Uuid, ServiceError> {
        validate_percentage("markup_pct", markup_pct)?;
        let db = self.db_pool.as_ref();
        let now = Utc::now();

        if let Some(mut existing) = PricingRuleEntity::find()
            .filter(pricing_rule::Column::Category.eq(category.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            let id = existing.id;
            existing.markup_pct = markup_pct;
            existing.is_active = is_active;
            existing.updated_at = now;
            existing
                .into_active_model()
                .update(db)
                .await
                .map_err(ServiceError::db_error)?;
            return Ok(id);
        }

        let model = pricing_rule::ActiveModel {
            id: Set(Uuid::new_v4()),
            category: Set(category),
            markup_pct: Set(markup_pct),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_pricing_rules(
        &self,
        active_only: bool,
    ) -> Result<Vec<pricing_rule::Model>, ServiceError> {
        let mut query = PricingRuleEntity::find().order_by_asc(pricing_rule::Column::Category);
        if active_only {
            query = query.filter(pricing_rule::Column::IsActive.eq(true));
        }
        query
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_bounds_are_inclusive() {
        assert!(validate_percentage("pct", Decimal::ZERO).is_ok());
        assert!(validate_percentage("pct", dec!(100)).is_ok());
        assert!(validate_percentage("pct", dec!(100.01)).is_err());
        assert!(validate_percentage("pct", dec!(-0.01)).is_err());
    }
}
