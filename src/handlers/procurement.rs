use super::common::{
    Json, created_response, map_service_error, paginated_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    entities::purchase_order::PurchaseOrderStatus,
    errors::ApiError,
    handlers::AppState,
    services::procurement::{
        CreateGoodsReceiptInput, CreatePurchaseOrderInput, PurchaseOrderFilter,
    },
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
pub struct CreatePurchaseOrderRequest {
    #[validate(length(min = 1))]
    pub po_number: String,
    pub vendor_id: Uuid,
    pub order_date: NaiveDate,
    pub total_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseOrderStatusRequest {
    pub status: PurchaseOrderStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateGoodsReceiptRequest {
    #[validate(length(min = 1))]
    pub gr_number: String,
    pub received_date: NaiveDate,
    pub received_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseOrderListQuery {
    pub vendor_id: Option<Uuid>,
    pub status: Option<PurchaseOrderStatus>,
}

async fn create_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let po_id = state
        .services
        .procurement
        .create_purchase_order(CreatePurchaseOrderInput {
            po_number: payload.po_number,
            vendor_id: payload.vendor_id,
            order_date: payload.order_date,
            total_amount: payload.total_amount,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!("Purchase order created: {}", po_id);

    Ok(created_response(serde_json::json!({ "id": po_id })))
}

async fn get_purchase_order(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let po = state
        .services
        .procurement
        .get_purchase_order(&po_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Purchase order with ID {} not found", po_id))
        })?;

    Ok(success_response(po))
}

async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<PurchaseOrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .procurement
        .list_purchase_orders(
            PurchaseOrderFilter {
                vendor_id: filter.vendor_id,
                status: filter.status,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        orders,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

async fn set_purchase_order_status(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
    Json(payload): Json<PurchaseOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .procurement
        .set_purchase_order_status(po_id, payload.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Purchase order status updated"
    })))
}

/// Record a goods receipt against a purchase order; refreshes the
/// three-way match on linked payables
async fn record_goods_receipt(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
    Json(payload): Json<CreateGoodsReceiptRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let receipt_id = state
        .services
        .procurement
        .record_goods_receipt(CreateGoodsReceiptInput {
            gr_number: payload.gr_number,
            purchase_order_id: po_id,
            received_date: payload.received_date,
            received_amount: payload.received_amount,
            notes: payload.notes,
        })
        .await
        .map_err(map_service_error)?;

    info!("Goods receipt recorded: {}", receipt_id);

    Ok(created_response(serde_json::json!({ "id": receipt_id })))
}

async fn list_goods_receipts(
    State(state): State<AppState>,
    Path(po_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let receipts = state
        .services
        .procurement
        .list_goods_receipts(po_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(receipts))
}

pub fn procurement_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id/receipts", get(list_goods_receipts))
}

pub fn procurement_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/:id/status", put(set_purchase_order_status))
        .route("/:id/receipts", post(record_goods_receipt))
}
