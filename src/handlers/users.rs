use super::common::{
    Json, created_response, map_service_error, paginated_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::users::{CreateUserInput, UpdateUserInput},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub role: String,
    pub tenant_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let user_id = state
        .services
        .users
        .create_user(CreateUserInput {
            email: payload.email,
            name: payload.name,
            password: payload.password,
            role: payload.role,
            tenant_id: payload.tenant_id,
        })
        .await
        .map_err(map_service_error)?;

    info!("User created: {}", user_id);

    Ok(created_response(serde_json::json!({ "id": user_id })))
}

async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .get_user(&user_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", user_id)))?;

    Ok(success_response(user))
}

async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (users, total) = state
        .services
        .users
        .list_users(pagination.page(), pagination.limit())
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        users,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .users
        .update_user(
            user_id,
            UpdateUserInput {
                name: payload.name,
                role: payload.role,
                active: payload.active,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "User updated successfully"
    })))
}

pub fn user_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
}

pub fn user_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", put(update_user))
}
