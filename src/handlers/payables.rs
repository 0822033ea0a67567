use super::common::{
    Json, created_response, map_service_error, paginated_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    entities::payable::PayableStatus,
    errors::ApiError,
    handlers::AppState,
    services::payables::{CreatePayableInput, PayableFilter},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePayableRequest {
    #[validate(length(min = 1))]
    pub invoice_number: String,
    pub vendor_id: Uuid,
    pub purchase_order_id: Option<Uuid>,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: PayableStatus,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct PayableListQuery {
    pub vendor_id: Option<Uuid>,
    pub status: Option<PayableStatus>,
}

/// Record a vendor invoice. Matching against PO and receipts is computed
/// on creation.
async fn create_payable(
    State(state): State<AppState>,
    Json(payload): Json<CreatePayableRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let payable_id = state
        .services
        .payables
        .create_payable(CreatePayableInput {
            invoice_number: payload.invoice_number,
            vendor_id: payload.vendor_id,
            purchase_order_id: payload.purchase_order_id,
            invoice_date: payload.invoice_date,
            due_date: payload.due_date,
            amount: payload.amount,
            description: payload.description,
        })
        .await
        .map_err(map_service_error)?;

    info!("Payable created: {}", payable_id);

    Ok(created_response(serde_json::json!({ "id": payable_id })))
}

async fn get_payable(
    State(state): State<AppState>,
    Path(payable_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payable = state
        .services
        .payables
        .get_payable(&payable_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Payable with ID {} not found", payable_id)))?;

    Ok(success_response(payable))
}

async fn list_payables(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<PayableListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (payables, total) = state
        .services
        .payables
        .list_payables(
            PayableFilter {
                vendor_id: filter.vendor_id,
                status: filter.status,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        payables,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

/// Move a payable along its lifecycle
async fn transition_payable(
    State(state): State<AppState>,
    Path(payable_id): Path<Uuid>,
    Json(payload): Json<TransitionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .payables
        .transition_status(payable_id, payload.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Payable status updated"
    })))
}

/// Record a payment against an approved payable
async fn record_payment(
    State(state): State<AppState>,
    Path(payable_id): Path<Uuid>,
    Json(payload): Json<PaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .services
        .payables
        .record_payment(payable_id, payload.amount)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({ "status": status })))
}

pub fn payable_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payables))
        .route("/:id", get(get_payable))
}

pub fn payable_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payable))
        .route("/:id/status", put(transition_payable))
        .route("/:id/payments", post(record_payment))
}
