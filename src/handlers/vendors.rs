use super::common::{
    Json, created_response, map_service_error, no_content_response, paginated_response, success_response,
    validate_input, PaginationParams,
};
use crate::{
    entities::vendor::VendorClassification,
    errors::ApiError,
    handlers::AppState,
    services::vendors::{CreateVendorInput, UpdateVendorInput, VendorFilter},
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
pub struct CreateVendorRequest {
    #[validate(length(min = 1))]
    pub vendor_name: String,
    pub classification: VendorClassification,
    #[serde(default)]
    pub is_preferred: bool,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVendorRequest {
    pub vendor_name: Option<String>,
    pub classification: Option<VendorClassification>,
    pub is_preferred: Option<bool>,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VendorListQuery {
    pub classification: Option<VendorClassification>,
    #[serde(default)]
    pub preferred: bool,
    pub search: Option<String>,
}

async fn create_vendor(
    State(state): State<AppState>,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let vendor_id = state
        .services
        .vendors
        .create_vendor(CreateVendorInput {
            vendor_name: payload.vendor_name,
            classification: payload.classification,
            is_preferred: payload.is_preferred,
            contact_name: payload.contact_name,
            email: payload.email,
            phone: payload.phone,
            address: payload.address,
        })
        .await
        .map_err(map_service_error)?;

    info!("Vendor created: {}", vendor_id);

    Ok(created_response(serde_json::json!({ "id": vendor_id })))
}

async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let vendor = state
        .services
        .vendors
        .get_vendor(&vendor_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Vendor with ID {} not found", vendor_id)))?;

    Ok(success_response(vendor))
}

async fn list_vendors(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<VendorListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (vendors, total) = state
        .services
        .vendors
        .list_vendors(
            VendorFilter {
                classification: filter.classification,
                preferred_only: filter.preferred,
                search: filter.search,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        vendors,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(payload): Json<UpdateVendorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .vendors
        .update_vendor(
            vendor_id,
            UpdateVendorInput {
                vendor_name: payload.vendor_name,
                classification: payload.classification,
                is_preferred: payload.is_preferred,
                contact_name: payload.contact_name,
                email: payload.email,
                phone: payload.phone,
                address: payload.address,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Vendor updated successfully"
    })))
}

async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .vendors
        .delete_vendor(vendor_id)
        .await
        .map_err(map_service_error)?;

    info!("Vendor deleted: {}", vendor_id);

    Ok(no_content_response())
}

pub fn vendor_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vendors))
        .route("/:id", get(get_vendor))
}

pub fn vendor_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_vendor))
        .route("/:id", put(update_vendor))
        .route("/:id", delete(delete_vendor))
}
