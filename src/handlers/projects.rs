use super::common::{
    Json, created_response, map_service_error, paginated_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    auth::AuthUser,
    entities::project::ProjectStatus,
    errors::{ApiError, ServiceError},
    handlers::AppState,
    services::projects::{CreateProjectInput, ProjectFilter, UpdateProjectInput, WonOrderInput},
    webhooks::verify_signature,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1))]
    pub project_code: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub client_name: String,
    pub contract_value: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub contract_value: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectStatusRequest {
    pub status: ProjectStatus,
}

#[derive(Debug, Deserialize)]
pub struct AssignManagerRequest {
    pub manager_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
    pub manager_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Flat payload describing a won sales order
#[derive(Debug, Deserialize)]
pub struct ProjectWonPayload {
    pub order_id: String,
    pub client_name: String,
    pub project_name: String,
    pub contract_value: Option<Decimal>,
}

async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let project_id = state
        .services
        .projects
        .create_project(CreateProjectInput {
            project_code: payload.project_code,
            name: payload.name,
            client_name: payload.client_name,
            contract_value: payload.contract_value,
            description: payload.description,
        })
        .await
        .map_err(map_service_error)?;

    info!("Project created: {}", project_id);

    Ok(created_response(serde_json::json!({ "id": project_id })))
}

async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .services
        .projects
        .get_project(&project_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Project with ID {} not found", project_id)))?;

    Ok(success_response(project))
}

async fn list_projects(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ProjectListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (projects, total) = state
        .services
        .projects
        .list_projects(
            ProjectFilter {
                status: filter.status,
                manager_id: filter.manager_id,
                search: filter.search,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        projects,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .projects
        .update_project(
            project_id,
            UpdateProjectInput {
                name: payload.name,
                client_name: payload.client_name,
                contract_value: payload.contract_value,
                description: payload.description,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Project updated successfully"
    })))
}

async fn set_project_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ProjectStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .projects
        .set_status(project_id, payload.status, user.id().ok())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Project status updated"
    })))
}

/// Assign the project manager. Gated to operational management roles by
/// the route-level policy.
async fn assign_manager(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<AssignManagerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .projects
        .assign_manager(project_id, payload.manager_id, user.id().ok())
        .await
        .map_err(map_service_error)?;

    info!(
        "Project {} manager assigned: {}",
        project_id, payload.manager_id
    );

    Ok(success_response(serde_json::json!({
        "message": "Project manager assigned"
    })))
}

async fn list_activity(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (entries, total) = state
        .services
        .projects
        .list_activity(project_id, pagination.page(), pagination.limit())
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        entries,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

/// POST /events/project-won
///
/// Cross-service webhook materializing a project from a won sales order.
/// Authenticated by HMAC signature headers rather than a bearer token;
/// idempotent on the order id.
pub async fn project_won_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    if let Some(secret) = state.config.project_won_webhook_secret.as_deref() {
        let timestamp = headers
            .get("x-timestamp")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let signature = headers
            .get("x-signature")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if !verify_signature(
            timestamp,
            signature,
            &body,
            secret,
            state.config.project_won_webhook_tolerance_secs,
        ) {
            warn!("Project-won webhook signature verification failed");
            return Err(ServiceError::Unauthorized(
                "invalid webhook signature".into(),
            ));
        }
    }

    let payload: ProjectWonPayload = serde_json::from_slice(&body)
        .map_err(|e| ServiceError::BadRequest(format!("invalid json: {}", e)))?;

    if payload.order_id.trim().is_empty() {
        return Err(ServiceError::ValidationError(
            "order_id must not be empty".into(),
        ));
    }

    let project_id = state
        .services
        .projects
        .create_from_won_order(WonOrderInput {
            order_id: payload.order_id,
            client_name: payload.client_name,
            project_name: payload.project_name,
            contract_value: payload.contract_value,
        })
        .await?;

    Ok(success_response(
        serde_json::json!({ "project_id": project_id }),
    ))
}

pub fn project_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects))
        .route("/:id", get(get_project))
        .route("/:id/activity", get(list_activity))
}

pub fn project_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project))
        .route("/:id", put(update_project))
        .route("/:id/status", put(set_project_status))
}

pub fn project_assign_routes() -> Router<AppState> {
    Router::new().route("/:id/manager", put(assign_manager))
}
