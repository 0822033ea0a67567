use crate::{
    db::DbPool,
    entities::chart_of_accounts::{self, AccountType, Entity as AccountEntity},
    entities::journal_entry::{self, Entity as JournalEntryEntity},
    errors::ServiceError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Per-account totals in the trial balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    /// Signed by account type: debit-normal accounts report
    /// debit − credit, credit-normal accounts credit − debit
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalance {
    pub accounts: Vec<AccountBalance>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_revenue: Decimal,
    pub total_expense: Decimal,
    pub net_income: Decimal,
}

/// Query-time financial reports over the journal. Nothing is persisted.
#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Aggregates every account's debits and credits.
    #[instrument(skip(self))]
    pub async fn trial_balance(&self) -> Result<TrialBalance, ServiceError> {
        let db = self.db_pool.as_ref();

        let accounts = AccountEntity::find()
            .order_by_asc(chart_of_accounts::Column::AccountCode)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let entries = JournalEntryEntity::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut totals: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for entry in &entries {
            let slot = totals.entry(entry.account_id).or_default();
            slot.0 += entry.debit.unwrap_or_default();
            slot.1 += entry.credit.unwrap_or_default();
        }

        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;
        let balances = accounts
            .into_iter()
            .map(|account| {
                let (debit, credit) = totals.get(&account.id).copied().unwrap_or_default();
                total_debit += debit;
                total_credit += credit;
                let balance = if account.account_type.is_debit_normal() {
                    debit - credit
                } else {
                    credit - debit
                };
                AccountBalance {
                    account_id: account.id,
                    account_code: account.account_code,
                    account_name: account.account_name,
                    account_type: account.account_type,
                    total_debit: debit,
                    total_credit: credit,
                    balance,
                }
            })
            .collect();

        Ok(TrialBalance {
            accounts: balances,
            total_debit,
            total_credit,
        })
    }

    /// Revenue credits minus expense debits over a date range, inclusive.
    #[instrument(skip(self))]
    pub async fn income_statement(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeStatement, ServiceError> {
        if from > to {
            return Err(ServiceError::ValidationError(
                "Report range start must not be after its end".into(),
            ));
        }

        let db = self.db_pool.as_ref();

        let accounts = AccountEntity::find()
            .filter(
                chart_of_accounts::Column::AccountType
                    .is_in([AccountType::Revenue, AccountType::Expense]),
            )
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let account_types: HashMap<Uuid, AccountType> = accounts
            .into_iter()
            .map(|a| (a.id, a.account_type))
            .collect();

        let entries = JournalEntryEntity::find()
            .filter(journal_entry::Column::TransactionDate.gte(from))
            .filter(journal_entry::Column::TransactionDate.lte(to))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut total_revenue = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        for entry in entries {
            match account_types.get(&entry.account_id) {
                Some(AccountType::Revenue) => {
                    total_revenue += entry.credit.unwrap_or_default();
                    total_revenue -= entry.debit.unwrap_or_default();
                }
                Some(AccountType::Expense) => {
                    total_expense += entry.debit.unwrap_or_default();
                    total_expense -= entry.credit.unwrap_or_default();
                }
                _ => {}
            }
        }

        Ok(IncomeStatement {
            from,
            to,
            total_revenue,
            total_expense,
            net_income: total_revenue - total_expense,
        })
    }
}
