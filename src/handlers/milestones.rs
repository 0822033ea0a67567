use super::common::{
    Json, created_response, map_service_error, success_response, validate_input,
};
use crate::{
    auth::AuthUser,
    entities::project_milestone::MilestoneStatus,
    entities::project_task::TaskStatus,
    errors::ApiError,
    handlers::AppState,
    services::milestones::{
        CreateTaskInput, CreateTemplateInput, TemplateItemInput, UpdateTaskInput,
    },
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TemplateItemRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub duration_days: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    #[validate]
    pub items: Vec<TemplateItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyTemplateRequest {
    pub template_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct MilestoneStatusRequest {
    pub status: MilestoneStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub assignee_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub progress_pct: Option<i32>,
    pub status: Option<TaskStatus>,
    pub notes: Option<String>,
}

async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let template_id = state
        .services
        .milestones
        .create_template(CreateTemplateInput {
            name: payload.name,
            description: payload.description,
            items: payload
                .items
                .into_iter()
                .map(|item| TemplateItemInput {
                    name: item.name,
                    duration_days: item.duration_days,
                })
                .collect(),
        })
        .await
        .map_err(map_service_error)?;

    info!("Milestone template created: {}", template_id);

    Ok(created_response(serde_json::json!({ "id": template_id })))
}

async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let template = state
        .services
        .milestones
        .get_template(&template_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Template with ID {} not found", template_id))
        })?;

    Ok(success_response(template))
}

async fn list_templates(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let templates = state
        .services
        .milestones
        .list_templates()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(templates))
}

/// Apply a milestone template to a project. Restricted to the project's
/// assigned manager; milestones are scheduled back-to-back from today.
async fn apply_template(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ApplyTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let actor_id = user.id().map_err(|_| ApiError::Unauthorized)?;

    let milestones = state
        .services
        .milestones
        .apply_template(project_id, payload.template_id, actor_id, user.is_admin())
        .await
        .map_err(map_service_error)?;

    info!(
        "Template {} applied to project {}: {} milestones",
        payload.template_id,
        project_id,
        milestones.len()
    );

    Ok(created_response(milestones))
}

async fn list_milestones(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let milestones = state
        .services
        .milestones
        .list_milestones(project_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(milestones))
}

async fn set_milestone_status(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
    Json(payload): Json<MilestoneStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .milestones
        .set_milestone_status(milestone_id, payload.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Milestone status updated"
    })))
}

async fn create_task(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let task_id = state
        .services
        .milestones
        .create_task(CreateTaskInput {
            milestone_id,
            name: payload.name,
            assignee_id: payload.assignee_id,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    Ok(created_response(serde_json::json!({ "id": task_id })))
}

async fn list_tasks(
    State(state): State<AppState>,
    Path(milestone_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let tasks = state
        .services
        .milestones
        .list_tasks(milestone_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(tasks))
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .milestones
        .update_task(
            task_id,
            UpdateTaskInput {
                name: payload.name,
                assignee_id: payload.assignee_id,
                progress_pct: payload.progress_pct,
                status: payload.status,
                notes: payload.notes,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Task updated successfully"
    })))
}

/// Template catalog routes, nested under /milestone-templates
pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_template))
        .route("/", get(list_templates))
        .route("/:id", get(get_template))
}

/// Milestone routes nested under /projects
pub fn project_milestone_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/milestones", get(list_milestones))
        .route("/:id/milestones/apply-template", post(apply_template))
}

/// Milestone status and task routes, nested under /milestones
pub fn milestone_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/status", put(set_milestone_status))
        .route("/:id/tasks", post(create_task))
        .route("/:id/tasks", get(list_tasks))
}

/// Task routes, nested under /tasks
pub fn task_routes() -> Router<AppState> {
    Router::new().route("/:id", put(update_task))
}
