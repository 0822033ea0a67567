use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One line of a balanced journal transaction. Lines sharing a
/// `transaction_id` were posted together and their debits equal their
/// credits.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Groups the lines of one balanced transaction
    pub transaction_id: Uuid,

    pub transaction_date: NaiveDate,

    pub account_id: Uuid,

    /// Exactly one of debit/credit is set, strictly positive
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,

    pub description: String,

    /// Reference to the originating document (e.g., "Payable", "GoodsReceipt")
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,

    pub created_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chart_of_accounts::Entity",
        from = "Column::AccountId",
        to = "super::chart_of_accounts::Column::Id"
    )]
    Account,
}

impl Related<super::chart_of_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Get signed amount (positive for debit, negative for credit)
    pub fn signed_amount(&self) -> Decimal {
        self.debit.unwrap_or_default() - self.credit.unwrap_or_default()
    }
}
