use crate::{
    db::DbPool,
    entities::exchange_rate::{self, Entity as ExchangeRateEntity},
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateCurrencyInput {
    pub currency_code: String,
    pub currency_name: String,
    pub rate: Decimal,
    pub effective_date: NaiveDate,
}

/// One entry of a bulk rate update
#[derive(Debug, Clone)]
pub struct RateUpdateInput {
    pub currency_code: String,
    pub rate: Decimal,
}

/// Service managing currencies and their exchange rates
#[derive(Clone)]
pub struct CurrencyService {
    db_pool: Arc<DbPool>,
}

impl CurrencyService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn validate_rate(rate: Decimal) -> Result<(), ServiceError> {
        if rate <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Exchange rate must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Registers a currency. Duplicate codes surface as conflicts.
    #[instrument(skip(self, input), fields(code = %input.currency_code))]
    pub async fn create_currency(&self, input: CreateCurrencyInput) -> Result<Uuid, ServiceError> {
        Self::validate_rate(input.rate)?;
        if input.currency_code.len() != 3 {
            return Err(ServiceError::ValidationError(
                "Currency code must be a 3-letter ISO code".into(),
            ));
        }

        let db = self.db_pool.as_ref();
        let code = input.currency_code.to_uppercase();

        let duplicate = ExchangeRateEntity::find()
            .filter(exchange_rate::Column::CurrencyCode.eq(code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Currency '{}' already exists",
                code
            )));
        }

        let now = Utc::now();
        let model = exchange_rate::ActiveModel {
            id: Set(Uuid::new_v4()),
            currency_code: Set(code),
            currency_name: Set(input.currency_name),
            rate: Set(input.rate),
            effective_date: Set(input.effective_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_currencies(&self) -> Result<Vec<exchange_rate::Model>, ServiceError> {
        ExchangeRateEntity::find()
            .order_by_asc(exchange_rate::Column::CurrencyCode)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Updates a batch of rates in one transaction; every code must exist
    /// or the whole update rolls back. Runs synchronously within the
    /// request.
    #[instrument(skip(self, updates), fields(count = updates.len()))]
    pub async fn bulk_update_rates(
        &self,
        updates: Vec<RateUpdateInput>,
        effective_date: NaiveDate,
    ) -> Result<usize, ServiceError> {
        if updates.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one rate update is required".into(),
            ));
        }
        for update in &updates {
            Self::validate_rate(update.rate)?;
        }

        let db = self.db_pool.as_ref();
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let mut updated = 0;
        for update in updates {
            let code = update.currency_code.to_uppercase();
            let mut model = ExchangeRateEntity::find()
                .filter(exchange_rate::Column::CurrencyCode.eq(code.clone()))
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Currency '{}' not found", code))
                })?;

            model.rate = update.rate;
            model.effective_date = effective_date;
            model.updated_at = Utc::now();
            model
                .into_active_model()
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            updated += 1;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        Ok(updated)
    }
}
