use crate::{
    db::DbPool,
    entities::chart_of_accounts::{self, AccountType, Entity as AccountEntity},
    entities::journal_entry::{self, Entity as JournalEntryEntity},
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

/// Input payload for creating an account
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub description: Option<String>,
}

/// Input payload for updating mutable account fields
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    pub account_name: Option<String>,
    pub description: Option<String>,
}

/// Filters accepted by the account listing
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub account_type: Option<AccountType>,
    pub search: Option<String>,
}

/// Service for managing the chart of accounts
#[derive(Clone)]
pub struct ChartOfAccountsService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ChartOfAccountsService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates an account. Duplicate account codes surface as conflicts.
    #[instrument(skip(self, input))]
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        let existing = AccountEntity::find()
            .filter(chart_of_accounts::Column::AccountCode.eq(input.account_code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Account code '{}' already exists",
                input.account_code
            )));
        }

        let now = Utc::now();
        let model = chart_of_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            account_code: Set(input.account_code),
            account_name: Set(input.account_name),
            account_type: Set(input.account_type),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::AccountCreated(account.id))
            .await;

        Ok(account.id)
    }

    #[instrument(skip(self))]
    pub async fn get_account(
        &self,
        account_id: &Uuid,
    ) -> Result<Option<chart_of_accounts::Model>, ServiceError> {
        AccountEntity::find_by_id(*account_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Returns paginated accounts with optional type and name/code filters.
    #[instrument(skip(self))]
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<chart_of_accounts::Model>, u64), ServiceError> {
        let db = self.db_pool.as_ref();
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(account_type) = filter.account_type {
            condition = condition.add(chart_of_accounts::Column::AccountType.eq(account_type));
        }
        if let Some(term) = filter.search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim().to_lowercase());
            condition = condition.add(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(
                            chart_of_accounts::Column::AccountName,
                        )))
                        .like(pattern.clone()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(
                            chart_of_accounts::Column::AccountCode,
                        )))
                        .like(pattern),
                    ),
            );
        }

        let paginator = AccountEntity::find()
            .filter(condition)
            .order_by_asc(chart_of_accounts::Column::AccountCode)
            .paginate(db, limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let accounts = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((accounts, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_account(
        &self,
        account_id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let mut model = AccountEntity::find_by_id(account_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Account {} not found", account_id))
            })?;

        if let Some(name) = input.account_name {
            model.account_name = name;
        }
        if let Some(description) = input.description {
            model.description = Some(description);
        }
        model.updated_at = Utc::now();

        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::AccountUpdated(account_id))
            .await;

        Ok(())
    }

    /// Deletes an account. Rejected while any journal line references it.
    #[instrument(skip(self))]
    pub async fn delete_account(&self, account_id: Uuid) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();

        let account = AccountEntity::find_by_id(account_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Account {} not found", account_id))
            })?;

        let referencing = JournalEntryEntity::find()
            .filter(journal_entry::Column::AccountId.eq(account_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        if referencing > 0 {
            return Err(ServiceError::BadRequest(format!(
                "Account '{}' has {} journal entries and cannot be deleted",
                account.account_code, referencing
            )));
        }

        AccountEntity::delete_by_id(account_id)
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::AccountDeleted(account_id))
            .await;

        Ok(())
    }
}
