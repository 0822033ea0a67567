use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Project status progression. Cancellation is terminal.
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
pub enum ProjectStatus {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "Planning")]
    Planning,
    #[sea_orm(string_value = "Execution")]
    Execution,
    #[sea_orm(string_value = "Closing")]
    Closing,
    #[sea_orm(string_value = "Closed")]
    Closed,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl ProjectStatus {
    /// Statuses advance one step at a time; cancellation is allowed from
    /// any non-terminal status.
    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, next),
            (New, Planning)
                | (Planning, Execution)
                | (Execution, Closing)
                | (Closing, Closed)
                | (New, Cancelled)
                | (Planning, Cancelled)
                | (Execution, Cancelled)
                | (Closing, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Closed | ProjectStatus::Cancelled)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub project_code: String,

    pub name: String,

    pub client_name: String,

    pub status: ProjectStatus,

    /// Assigned project manager; gates milestone template application
    pub manager_id: Option<Uuid>,

    pub contract_value: Option<Decimal>,

    /// Sales order that materialized this project via the project-won
    /// webhook, when applicable
    pub source_order_id: Option<String>,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_milestone::Entity")]
    Milestones,
    #[sea_orm(has_many = "super::activity_log::Entity")]
    ActivityLogs,
    #[sea_orm(has_many = "super::bom_line::Entity")]
    BomLines,
}

impl Related<super::project_milestone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Milestones.def()
    }
}

impl Related<super::activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityLogs.def()
    }
}

impl Related<super::bom_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BomLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
