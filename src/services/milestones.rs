use crate::{
    db::DbPool,
    entities::milestone_template::{self, Entity as TemplateEntity},
    entities::milestone_template_item::{self, Entity as TemplateItemEntity},
    entities::project::{Entity as ProjectEntity, ProjectStatus},
    entities::project_milestone::{self, Entity as MilestoneEntity, MilestoneStatus},
    entities::project_task::{self, Entity as TaskEntity, TaskStatus},
    errors::ServiceError,
    events::{Event, EventSender},
    services::projects::ProjectService,
};
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TemplateItemInput {
    pub name: String,
    pub duration_days: i32,
}

#[derive(Debug, Clone)]
pub struct CreateTemplateInput {
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<TemplateItemInput>,
}

/// Template with its ordered milestone definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<milestone_template_item::Model>,
}

#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub milestone_id: Uuid,
    pub name: String,
    pub assignee_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    pub name: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub progress_pct: Option<i32>,
    pub status: Option<TaskStatus>,
    pub notes: Option<String>,
}

/// Service managing milestone templates, project milestones, and tasks
#[derive(Clone)]
pub struct MilestoneService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    projects: Arc<ProjectService>,
}

impl MilestoneService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        projects: Arc<ProjectService>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            projects,
        }
    }

    /// Creates a template with its ordered items in one transaction.
    #[instrument(skip(self, input))]
    pub async fn create_template(&self, input: CreateTemplateInput) -> Result<Uuid, ServiceError> {
        if input.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A template requires at least one milestone definition".into(),
            ));
        }
        if input.items.iter().any(|item| item.duration_days < 1) {
            return Err(ServiceError::ValidationError(
                "Milestone durations must be at least one day".into(),
            ));
        }

        let db = self.db_pool.as_ref();
        let duplicate = TemplateEntity::find()
            .filter(milestone_template::Column::Name.eq(input.name.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Template '{}' already exists",
                input.name
            )));
        }

        let now = Utc::now();
        let template_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let template = milestone_template::ActiveModel {
            id: Set(template_id),
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };
        template.insert(&txn).await.map_err(ServiceError::db_error)?;

        for (index, item) in input.items.into_iter().enumerate() {
            let model = milestone_template_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                template_id: Set(template_id),
                sequence: Set(index as i32 + 1),
                name: Set(item.name),
                duration_days: Set(item.duration_days),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        Ok(template_id)
    }

    #[instrument(skip(self))]
    pub async fn get_template(
        &self,
        template_id: &Uuid,
    ) -> Result<Option<TemplateView>, ServiceError> {
        let db = self.db_pool.as_ref();
        let Some(template) = TemplateEntity::find_by_id(*template_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(None);
        };

        let items = template
            .find_related(TemplateItemEntity)
            .order_by_asc(milestone_template_item::Column::Sequence)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(Some(TemplateView {
            id: template.id,
            name: template.name,
            description: template.description,
            items,
        }))
    }

    #[instrument(skip(self))]
    pub async fn list_templates(&self) -> Result<Vec<milestone_template::Model>, ServiceError> {
        TemplateEntity::find()
            .order_by_asc(milestone_template::Column::Name)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Applies a template to a project: milestones are laid out
    /// back-to-back starting today, each one beginning the day after the
    /// previous one ends. Only the project's assigned manager (or an
    /// admin) may apply. Milestones and the activity-log row insert in
    /// one transaction.
    #[instrument(skip(self))]
    pub async fn apply_template(
        &self,
        project_id: Uuid,
        template_id: Uuid,
        actor_id: Uuid,
        actor_is_admin: bool,
    ) -> Result<Vec<project_milestone::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        let project = ProjectEntity::find_by_id(project_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

        if !actor_is_admin && project.manager_id != Some(actor_id) {
            return Err(ServiceError::Forbidden(
                "Only the assigned project manager may apply a milestone template".into(),
            ));
        }

        if matches!(
            project.status,
            ProjectStatus::Closed | ProjectStatus::Cancelled
        ) {
            return Err(ServiceError::BadRequest(format!(
                "cannot apply a template to a {} project",
                project.status
            )));
        }

        let template = self
            .get_template(&template_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Template {} not found", template_id)))?;

        if template.items.is_empty() {
            return Err(ServiceError::BadRequest(format!(
                "Template '{}' has no milestone definitions",
                template.name
            )));
        }

        let schedule = layout_milestones(Utc::now().date_naive(), &template.items);

        let now = Utc::now();
        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        let mut created = Vec::with_capacity(schedule.len());
        for (item, (start_date, end_date)) in template.items.iter().zip(schedule) {
            let model = project_milestone::ActiveModel {
                id: Set(Uuid::new_v4()),
                project_id: Set(project_id),
                name: Set(item.name.clone()),
                sequence: Set(item.sequence),
                start_date: Set(start_date),
                end_date: Set(end_date),
                status: Set(MilestoneStatus::Pending),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(model.insert(&txn).await.map_err(ServiceError::db_error)?);
        }

        self.projects
            .log_activity(
                &txn,
                project_id,
                Some(actor_id),
                "milestone_template_applied",
                Some(serde_json::json!({
                    "template": template.name,
                    "milestones_created": created.len(),
                })),
            )
            .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::MilestoneTemplateApplied {
                project_id,
                template_id,
                milestone_count: created.len(),
            })
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn list_milestones(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<project_milestone::Model>, ServiceError> {
        MilestoneEntity::find()
            .filter(project_milestone::Column::ProjectId.eq(project_id))
            .order_by_asc(project_milestone::Column::Sequence)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn set_milestone_status(
        &self,
        milestone_id: Uuid,
        status: MilestoneStatus,
    ) -> Result<(), ServiceError> {
        let db = self.db_pool.as_ref();
        let mut model = MilestoneEntity::find_by_id(milestone_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Milestone {} not found", milestone_id))
            })?;

        model.status = status;
        model.updated_at = Utc::now();
        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_task(&self, input: CreateTaskInput) -> Result<Uuid, ServiceError> {
        let db = self.db_pool.as_ref();

        let milestone = MilestoneEntity::find_by_id(input.milestone_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if milestone.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Milestone {} not found",
                input.milestone_id
            )));
        }

        let now = Utc::now();
        let model = project_task::ActiveModel {
            id: Set(Uuid::new_v4()),
            milestone_id: Set(input.milestone_id),
            name: Set(input.name),
            assignee_id: Set(input.assignee_id),
            progress_pct: Set(0),
            status: Set(TaskStatus::Todo),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::TaskCreated {
                milestone_id: input.milestone_id,
                task_id: created.id,
            })
            .await;

        Ok(created.id)
    }

    #[instrument(skip(self))]
    pub async fn list_tasks(
        &self,
        milestone_id: Uuid,
    ) -> Result<Vec<project_task::Model>, ServiceError> {
        TaskEntity::find()
            .filter(project_task::Column::MilestoneId.eq(milestone_id))
            .order_by_asc(project_task::Column::CreatedAt)
            .all(self.db_pool.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, input))]
    pub async fn update_task(
        &self,
        task_id: Uuid,
        input: UpdateTaskInput,
    ) -> Result<(), ServiceError> {
        if let Some(progress) = input.progress_pct {
            if !(0..=100).contains(&progress) {
                return Err(ServiceError::ValidationError(
                    "Task progress must be between 0 and 100".into(),
                ));
            }
        }

        let db = self.db_pool.as_ref();
        let mut model = TaskEntity::find_by_id(task_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Task {} not found", task_id)))?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(assignee) = input.assignee_id {
            model.assignee_id = Some(assignee);
        }
        if let Some(progress) = input.progress_pct {
            model.progress_pct = progress;
        }
        if let Some(status) = input.status {
            model.status = status;
        }
        if let Some(notes) = input.notes {
            model.notes = Some(notes);
        }
        model.updated_at = Utc::now();

        model
            .into_active_model()
            .update(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(())
    }
}

/// Lays milestones out back-to-back: the first starts on `start`, each
/// spans `duration_days`, and each subsequent milestone starts the day
/// after the previous one ends.
fn layout_milestones(
    start: NaiveDate,
    items: &[milestone_template_item::Model],
) -> Vec<(NaiveDate, NaiveDate)> {
    let mut schedule = Vec::with_capacity(items.len());
    let mut cursor = start;
    for item in items {
        let end = cursor + Duration::days(item.duration_days as i64);
        schedule.push((cursor, end));
        cursor = end + Duration::days(1);
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sequence: i32, duration_days: i32) -> milestone_template_item::Model {
        let now = Utc::now();
        milestone_template_item::Model {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            sequence,
            name: format!("Phase {sequence}"),
            duration_days,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn milestones_are_laid_out_back_to_back_without_overlap() {
        let day0 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let schedule = layout_milestones(day0, &[item(1, 5), item(2, 10)]);

        // Durations of 5 and 10 days from day 0: spans day 0-5 and day 6-16
        assert_eq!(
            schedule[0],
            (day0, NaiveDate::from_ymd_opt(2026, 1, 6).unwrap())
        );
        assert_eq!(
            schedule[1],
            (
                NaiveDate::from_ymd_opt(2026, 1, 7).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 17).unwrap()
            )
        );
        assert!(schedule[1].0 > schedule[0].1);
    }

    #[test]
    fn single_item_layout_spans_its_duration() {
        let day0 = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let schedule = layout_milestones(day0, &[item(1, 1)]);
        assert_eq!(
            schedule,
            vec![(day0, NaiveDate::from_ymd_opt(2026, 6, 16).unwrap())]
        );
    }
}
