use super::common::{
    Json, created_response, map_service_error, no_content_response, paginated_response, success_response,
    validate_input, PaginationParams,
};
use crate::{
    entities::chart_of_accounts::AccountType,
    errors::ApiError,
    handlers::AppState,
    services::accounts::{AccountFilter, CreateAccountInput, UpdateAccountInput},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(length(min = 1))]
    pub account_code: String,
    #[validate(length(min = 1))]
    pub account_name: String,
    pub account_type: AccountType,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAccountRequest {
    pub account_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountListQuery {
    pub account_type: Option<AccountType>,
    pub search: Option<String>,
}

/// Create a new ledger account
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let account_id = state
        .services
        .accounts
        .create_account(CreateAccountInput {
            account_code: payload.account_code,
            account_name: payload.account_name,
            account_type: payload.account_type,
            description: payload.description,
        })
        .await
        .map_err(map_service_error)?;

    info!("Account created: {}", account_id);

    Ok(created_response(serde_json::json!({ "id": account_id })))
}

/// Get an account by ID
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .services
        .accounts
        .get_account(&account_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Account with ID {} not found", account_id)))?;

    Ok(success_response(account))
}

/// List accounts with pagination and filters
async fn list_accounts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<AccountListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (accounts, total) = state
        .services
        .accounts
        .list_accounts(
            AccountFilter {
                account_type: filter.account_type,
                search: filter.search,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        accounts,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

/// Update an account
async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .accounts
        .update_account(
            account_id,
            UpdateAccountInput {
                account_name: payload.account_name,
                description: payload.description,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Account updated successfully"
    })))
}

/// Delete an account. Rejected while journal entries reference it.
async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .accounts
        .delete_account(account_id)
        .await
        .map_err(map_service_error)?;

    info!("Account deleted: {}", account_id);

    Ok(no_content_response())
}

pub fn account_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts))
        .route("/:id", get(get_account))
}

pub fn account_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_account))
        .route("/:id", put(update_account))
        .route("/:id", delete(delete_account))
}
