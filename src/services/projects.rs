use crate::{
    db::DbPool,
    entities::activity_log::{self, Entity as ActivityLogEntity},
    entities::project::{self, Entity as ProjectEntity, ProjectStatus},
    entities::user::Entity as UserEntity,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    pub project_code: String,
    pub name: String,
    pub client_name: String,
    pub contract_value: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub contract_value: Option<Decimal>,
    pub description: Option<String>,
}

/// Flat payload describing a won sales order, delivered by the
/// project-won webhook.
#[derive(Debug, Clone)]
pub struct WonOrderInput {
    pub order_id: String,
    pub client_name: String,
    pub project_name: String,
    pub contract_value: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub manager_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Service for managing projects and their activity trail
#[derive(Clone)]
pub struct ProjectService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl ProjectService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_project(&self, input: CreateProjectInput) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        let duplicate = ProjectEntity::find()
            .filter(project::Column::ProjectCode.eq(input.project_code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Project code '{}' already exists",
                input.project_code
            )));
        }

        let now = Utc::now();
        let model = project::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_code: Set(input.project_code),
            name: Set(input.name),
            client_name: Set(input.client_name),
            status: Set(ProjectStatus::New),
            manager_id: Set(None),
            contract_value: Set(input.contract_value),
            source_order_id: Set(None),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::ProjectCreated(created.id))
            .await;

        Ok(created.id)
    }

    /// Materializes a project from a won sales order. Idempotent on the
    /// order id: a repeat delivery returns the existing project.
    #[instrument(skip(self, input), fields(order = %input.order_id))]
    pub async fn create_from_won_order(&self, input: WonOrderInput) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        if let Some(existing) = ProjectEntity::find()
            .filter(project::Column::SourceOrderId.eq(input.order_id.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            info!(project = %existing.id, "Won order already materialized");
            return Ok(existing.id);
        }

        let now = Utc::now();
        let project_id = Uuid::new_v4();
        let project_code = format!("PRJ-{}", &project_id.simple().to_string()[..8].to_uppercase());
        let model = project::ActiveModel {
            id: Set(project_id),
            project_code: Set(project_code),
            name: Set(input.project_name),
            client_name: Set(input.client_name),
            status: Set(ProjectStatus::New),
            manager_id: Set(None),
            contract_value: Set(input.contract_value),
            source_order_id: Set(Some(input.order_id.clone())),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.log_activity(
            db,
            created.id,
            None,
            "project_won",
            Some(serde_json::json!({ "order_id": input.order_id })),
        )
        .await?;

        self.event_sender
            .send_or_log(Event::ProjectWon {
                project_id: created.id,
                source_order_id: input.order_id,
            })
            .await;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn get_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Option<project::Model>, ServiceError> {
        ProjectEntity::find_by_id(*project_id)
            .one(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_projects(
        &self,
        filter: ProjectFilter,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<project::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let mut condition = Condition::all();
        if let Some(status) = filter.status {
            condition = condition.add(project::Column::Status.eq(status));
        }
        if let Some(manager_id) = filter.manager_id {
            condition = condition.add(project::Column::ManagerId.eq(manager_id));
        }
        if let Some(term) = filter.search.filter(|t| !t.trim().is_empty()) {
            let pattern = format!("%{}%", term.trim().to_lowercase());
            condition = condition.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(project::Column::Name))).like(pattern.clone()))
                    .add(
                        Expr::expr(Func::lower(Expr::col(project::Column::ClientName)))
                            .like(pattern),
                    ),
            );
        }

        let paginator = ProjectEntity::find()
            .filter(condition)
            .order_by_desc(project::Column::CreatedAt)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let projects = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((projects, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_project(
        &self,
        project_id: Uuid,
        input: UpdateProjectInput,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let mut model = ProjectEntity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(client) = input.client_name {
            model.client_name = client;
        }
        if let Some(value) = input.contract_value {
            model.contract_value = Some(value);
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

        Ok(())
    }

    /// Advances the project status, enforcing the progression order.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        project_id: Uuid,
        next: ProjectStatus,
        actor_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let mut model = ProjectEntity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

        let current = model.status;
        if !current.can_transition_to(next) {
            return Err(ServiceError::InvalidStatus(format!(
                "cannot move project from {} to {}",
                current, next
            )));
        }

        model.status = next;
        model.updated_at = Utc::now();
        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.log_activity(
            db,
            project_id,
            actor_id,
            "status_changed",
            Some(serde_json::json!({ "from": current.to_string(), "to": next.to_string() })),
        )
        .await?;

        self.event_sender
            .send_or_log(Event::ProjectStatusChanged {
                project_id,
                old_status: current.to_string(),
                new_status: next.to_string(),
            })
            .await;

        Ok(())
    }

    /// Assigns the project manager. Route-level policy restricts callers
    /// to operational management roles.
    #[instrument(skip(self))]
    pub async fn assign_manager(
        &self,
        project_id: Uuid,
        manager_id: Uuid,
        actor_id: Option<Uuid>,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();

        let manager = UserEntity::find_by_id(manager_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if manager.is_none() {
            return Err(ServiceError::NotFound(format!(
                "User {} not found",
                manager_id
            )));
        }

        let mut model = ProjectEntity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

        if model.status.is_terminal() {
            return Err(ServiceError::InvalidOperation(format!(
                "cannot assign a manager to a {} project",
                model.status
            )));
        }

        model.manager_id = Some(manager_id);
        model.updated_at = Utc::now();
        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        self.log_activity(
            db,
            project_id,
            actor_id,
            "manager_assigned",
            Some(serde_json::json!({ "manager_id": manager_id })),
        )
        .await?;

        self.event_sender
            .send_or_log(Event::ProjectManagerAssigned {
                project_id,
                manager_id,
            })
            .await;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_activity(
        &self,
        project_id: Uuid,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<activity_log::Model>, u64), ServiceError> {
        let limit = limit.max(1);
        let page = page.max(1) - 1;

        let paginator = ActivityLogEntity::find()
            .filter(activity_log::Column::ProjectId.eq(project_id))
            .order_by_desc(activity_log::Column::RecordedAt)
            .paginate(self.db_pool.as_ref(), limit);

        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let entries = paginator
            .fetch_page(page)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((entries, total))
    }

    /// Appends an activity-log row. Shared with the milestone service so
    /// template application can log inside its own transaction.
    pub async fn log_activity<C: ConnectionTrait>(
        &self,
        db: &C,
        project_id: Uuid,
        actor_id: Option<Uuid>,
        action: &str,
        detail: Option<serde_json::Value>,
    ) -> Result<(), ServiceError> {
        let model = activity_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(project_id),
            actor_id: Set(actor_id),
            action: Set(action.to_string()),
            detail: Set(detail),
            recorded_at: Set(Utc::now()),
        };
        model.insert(db).await.map_err(ServiceError::db_error)?;
        Ok(())
    }
}
