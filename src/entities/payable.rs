use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payable lifecycle. DRAFT → APPROVED → PARTIALLY_PAID → PAID, with
/// DISPUTE reachable from DRAFT/APPROVED and released back to APPROVED.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PayableStatus {
    #[sea_orm(string_value = "Draft")]
    Draft,
    #[sea_orm(string_value = "Approved")]
    Approved,
    #[sea_orm(string_value = "PartiallyPaid")]
    PartiallyPaid,
    #[sea_orm(string_value = "Paid")]
    Paid,
    #[sea_orm(string_value = "Dispute")]
    Dispute,
}

impl PayableStatus {
    pub fn can_transition_to(&self, next: PayableStatus) -> bool {
        use PayableStatus::*;
        matches!(
            (self, next),
            (Draft, Approved)
                | (Approved, PartiallyPaid)
                | (Approved, Paid)
                | (PartiallyPaid, Paid)
                | (Draft, Dispute)
                | (Approved, Dispute)
                | (Dispute, Approved)
        )
    }
}

/// Three-way match outcome against the linked PO and its receipts
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum MatchingStatus {
    #[sea_orm(string_value = "NotMatched")]
    NotMatched,
    #[sea_orm(string_value = "PartiallyMatched")]
    PartiallyMatched,
    #[sea_orm(string_value = "Matched")]
    Matched,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payables")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Unique per vendor
    pub invoice_number: String,

    pub vendor_id: Uuid,

    pub purchase_order_id: Option<Uuid>,

    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,

    pub amount: Decimal,
    pub amount_paid: Decimal,

    pub status: PayableStatus,

    pub matching_status: MatchingStatus,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor::Entity",
        from = "Column::VendorId",
        to = "super::vendor::Column::Id"
    )]
    Vendor,
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::Id"
    )]
    PurchaseOrder,
}

impl Related<super::vendor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispute_only_releases_back_to_approved() {
        assert!(PayableStatus::Dispute.can_transition_to(PayableStatus::Approved));
        assert!(!PayableStatus::Dispute.can_transition_to(PayableStatus::Paid));
        assert!(!PayableStatus::Paid.can_transition_to(PayableStatus::Approved));
    }
}
