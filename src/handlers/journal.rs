use super::common::{
    Json, created_response, map_service_error, paginated_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    auth::AuthUser,
    errors::ApiError,
    handlers::AppState,
    services::journal::{JournalLineInput, PostTransactionInput},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    pub account_id: Uuid,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PostTransactionRequest {
    pub transaction_date: NaiveDate,
    #[validate(length(min = 1))]
    pub description: String,
    pub lines: Vec<JournalLineRequest>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct EntryListQuery {
    pub account_id: Option<Uuid>,
}

/// Post a balanced journal transaction. The balance invariant is enforced
/// here, inside the same transaction that persists the lines.
async fn post_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<PostTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let created_by = user.id().ok();
    let transaction_id = state
        .services
        .journal
        .post_transaction(PostTransactionInput {
            transaction_date: payload.transaction_date,
            description: payload.description,
            lines: payload
                .lines
                .into_iter()
                .map(|line| JournalLineInput {
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    description: line.description,
                })
                .collect(),
            reference_type: payload.reference_type,
            reference_id: payload.reference_id,
            created_by,
        })
        .await
        .map_err(map_service_error)?;

    info!("Journal transaction posted: {}", transaction_id);

    Ok(created_response(serde_json::json!({
        "transaction_id": transaction_id
    })))
}

/// Get one transaction with its lines
async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state
        .services
        .journal
        .get_transaction(&transaction_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Transaction with ID {} not found", transaction_id))
        })?;

    Ok(success_response(transaction))
}

/// List journal lines, optionally scoped to an account
async fn list_entries(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<EntryListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (entries, total) = state
        .services
        .journal
        .list_entries(filter.account_id, pagination.page(), pagination.limit())
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        entries,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

pub fn journal_read_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries))
        .route("/transactions/:id", get(get_transaction))
}

pub fn journal_post_routes() -> Router<AppState> {
    Router::new().route("/transactions", post(post_transaction))
}
