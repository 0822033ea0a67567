use crate::{
    db::DbPool,
    entities::chart_of_accounts::Entity as AccountEntity,
    entities::journal_entry::{self, Entity as JournalEntryEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Balance tolerance for a journal transaction
const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// One line of a transaction to post
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    pub account_id: Uuid,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub description: Option<String>,
}

/// Input payload for posting a balanced transaction
#[derive(Debug, Clone)]
pub struct PostTransactionInput {
    pub transaction_date: NaiveDate,
    pub description: String,
    pub lines: Vec<JournalLineInput>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

/// A posted transaction with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    pub transaction_id: Uuid,
    pub transaction_date: NaiveDate,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub lines: Vec<journal_entry::Model>,
}

/// Service posting and reading double-entry journal transactions
#[derive(Clone)]
pub struct JournalService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl JournalService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Posts a balanced transaction. Every line must reference an existing
    /// account and carry exactly one strictly positive amount; the debit
    /// and credit totals must agree within the 0.01 tolerance. All lines
    /// insert atomically.
    #[instrument(skip(self, input), fields(lines = input.lines.len()))]
    pub async fn post_transaction(
        &self,
        input: PostTransactionInput,
    ) -> Result<Uuid, ServiceError> {
        if input.lines.len() < 2 {
            return Err(ServiceError::ValidationError(
                "A journal transaction requires at least two lines".into(),
            ));
        }

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for (index, line) in input.lines.iter().enumerate() {
            match (line.debit, line.credit) {
                (Some(debit), None) if debit > Decimal::ZERO => total_debit += debit,
                (None, Some(credit)) if credit > Decimal::ZERO => total_credit += credit,
                _ => {
                    return Err(ServiceError::ValidationError(format!(
                        "Line {} must specify exactly one positive debit or credit amount",
                        index + 1
                    )))
                }
            }
        }

        let difference = (total_debit - total_credit).abs();
        if difference > BALANCE_TOLERANCE {
            return Err(ServiceError::UnbalancedTransaction(format!(
                "debits {} and credits {} differ by {}",
                total_debit, total_credit, difference
            )));
        }

        let db = self.db_pool.as_ref();

        // Validate account references before opening the transaction
        for line in &input.lines {
            let exists = AccountEntity::find_by_id(line.account_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;
            if exists.is_none() {
                return Err(ServiceError::NotFound(format!(
                    "Account {} not found",
                    line.account_id
                )));
            }
        }

        let transaction_id = Uuid::new_v4();
        let now = Utc::now();
        let line_count = input.lines.len();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        for line in input.lines {
            let model = journal_entry::ActiveModel {
                id: Set(Uuid::new_v4()),
                transaction_id: Set(transaction_id),
                transaction_date: Set(input.transaction_date),
                account_id: Set(line.account_id),
                debit: Set(line.debit),
                credit: Set(line.credit),
                description: Set(line
                    .description
                    .unwrap_or_else(|| input.description.clone())),
                reference_type: Set(input.reference_type.clone()),
                reference_id: Set(input.reference_id),
                created_by: Set(input.created_by),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::JournalEntryPosted {
                transaction_id,
                line_count,
                total_debit,
            })
            .await;

        Ok(transaction_id)
    }

    /// Fetches one transaction with its lines.
    #[instrument(skip(self))]
    pub async fn get_transaction(
        &self,
        transaction_id: &Uuid,
    ) -> Result<Option<TransactionView>, ServiceError> {
        let lines = JournalEntryEntity::find()
            .filter(journal_entry::Column::TransactionId.eq(*transaction_id))
            .order_by_asc(journal_entry::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        if lines.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self::to_view(*transaction_id, lines)))
    }

    /// Returns paginated journal lines, optionally scoped to an account.
    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        account_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<journal_entry::Model>, u64), ServiceError> {
        let db = self.db_pool.as_ref();
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut query = JournalEntryEntity::find()
            .order_by_desc(journal_entry::Column::TransactionDate)
            .order_by_desc(journal_entry::Column::CreatedAt);
        if let Some(account_id) = account_id {
            query = query.filter(journal_entry::Column::AccountId.eq(account_id));
        }

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let entries = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((entries, total))
    }

    fn to_view(transaction_id: Uuid, lines: Vec<journal_entry::Model>) -> TransactionView {
        let transaction_date = lines[0].transaction_date;
        let total_debit = lines.iter().filter_map(|l| l.debit).sum();
        let total_credit = lines.iter().filter_map(|l| l.credit).sum();
        TransactionView {
            transaction_id,
            transaction_date,
            total_debit,
            total_credit,
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(debit: Option<Decimal>, credit: Option<Decimal>) -> JournalLineInput {
        JournalLineInput {
            account_id: Uuid::new_v4(),
            debit,
            credit,
            description: None,
        }
    }

    fn input(lines: Vec<JournalLineInput>) -> PostTransactionInput {
        PostTransactionInput {
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            description: "test".into(),
            lines,
            reference_type: None,
            reference_id: None,
            created_by: None,
        }
    }

    async fn service() -> JournalService {
        // Single connection so the in-memory database is shared
        let config = crate::db::DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let db = crate::db::establish_connection_with_config(&config)
            .await
            .unwrap();
        crate::db::run_migrations(&db).await.unwrap();
        let (tx, _rx) = tokio::sync::mpsc::channel(16);
        JournalService::new(Arc::new(db), Arc::new(EventSender::new(tx)))
    }

    #[tokio::test]
    async fn unbalanced_transaction_reports_the_difference() {
        let svc = service().await;
        let result = svc
            .post_transaction(input(vec![
                line(Some(dec!(100)), None),
                line(Some(dec!(50)), None),
                line(None, Some(dec!(140))),
            ]))
            .await;

        match result {
            Err(ServiceError::UnbalancedTransaction(msg)) => {
                assert!(msg.contains("10"), "difference missing from: {msg}")
            }
            other => panic!("expected UnbalancedTransaction, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn line_with_both_amounts_is_rejected() {
        let svc = service().await;
        let result = svc
            .post_transaction(input(vec![
                JournalLineInput {
                    account_id: Uuid::new_v4(),
                    debit: Some(dec!(100)),
                    credit: Some(dec!(100)),
                    description: None,
                },
                line(None, Some(dec!(100))),
            ]))
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn single_line_transaction_is_rejected() {
        let svc = service().await;
        let result = svc
            .post_transaction(input(vec![line(Some(dec!(100)), None)]))
            .await;
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn unknown_account_is_rejected_before_any_write() {
        let svc = service().await;
        let result = svc
            .post_transaction(input(vec![
                line(Some(dec!(150)), None),
                line(None, Some(dec!(150))),
            ]))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));

        let (entries, total) = svc.list_entries(None, 1, 10).await.unwrap();
        assert!(entries.is_empty());
        assert_eq!(total, 0);
    }
}
