use super::common::{
    Json, created_response, map_service_error, no_content_response, paginated_response, success_response,
    validate_input, PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::bom::BomLineInput,
    services::catalog::{CatalogFilter, CreateCatalogItemInput, UpdateCatalogItemInput},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCatalogItemRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub unit: String,
    pub unit_price: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCatalogItemRequest {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<Decimal>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BomLineRequest {
    pub material_id: Option<Uuid>,
    pub service_item_id: Option<Uuid>,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceBomRequest {
    pub lines: Vec<BomLineRequest>,
}

impl From<CreateCatalogItemRequest> for CreateCatalogItemInput {
    fn from(payload: CreateCatalogItemRequest) -> Self {
        Self {
            code: payload.code,
            name: payload.name,
            unit: payload.unit,
            unit_price: payload.unit_price,
            category: payload.category,
        }
    }
}

impl From<UpdateCatalogItemRequest> for UpdateCatalogItemInput {
    fn from(payload: UpdateCatalogItemRequest) -> Self {
        Self {
            name: payload.name,
            unit: payload.unit,
            unit_price: payload.unit_price,
            category: payload.category,
        }
    }
}

// ---- Materials ----

async fn create_material(
    State(state): State<AppState>,
    Json(payload): Json<CreateCatalogItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let material_id = state
        .services
        .catalog
        .create_material(payload.into())
        .await
        .map_err(map_service_error)?;

    info!("Material created: {}", material_id);

    Ok(created_response(serde_json::json!({ "id": material_id })))
}

async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let material = state
        .services
        .catalog
        .get_material(&material_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Material with ID {} not found", material_id))
        })?;

    Ok(success_response(material))
}

async fn list_materials(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<CatalogListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (materials, total) = state
        .services
        .catalog
        .list_materials(
            CatalogFilter {
                category: filter.category,
                search: filter.search,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        materials,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
    Json(payload): Json<UpdateCatalogItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .update_material(material_id, payload.into())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Material updated successfully"
    })))
}

async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_material(material_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

// ---- Service items ----

async fn create_service_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateCatalogItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item_id = state
        .services
        .catalog
        .create_service_item(payload.into())
        .await
        .map_err(map_service_error)?;

    info!("Service item created: {}", item_id);

    Ok(created_response(serde_json::json!({ "id": item_id })))
}

async fn get_service_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state
        .services
        .catalog
        .get_service_item(&item_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Service item with ID {} not found", item_id))
        })?;

    Ok(success_response(item))
}

async fn update_service_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateCatalogItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .catalog
        .update_service_item(item_id, payload.into())
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Service item updated successfully"
    })))
}

async fn list_service_items(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<CatalogListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .catalog
        .list_service_items(
            CatalogFilter {
                category: filter.category,
                search: filter.search,
            },
            pagination.page(),
            pagination.limit(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(paginated_response(
        items,
        total,
        pagination.page(),
        pagination.limit(),
    ))
}

// ---- Bill of materials ----

/// Replace a project's BoM atomically
async fn replace_bom(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<ReplaceBomRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let bom = state
        .services
        .bom
        .replace_bom(
            project_id,
            payload
                .lines
                .into_iter()
                .map(|line| BomLineInput {
                    material_id: line.material_id,
                    service_item_id: line.service_item_id,
                    quantity: line.quantity,
                })
                .collect(),
        )
        .await
        .map_err(map_service_error)?;

    info!(
        "BoM replaced for project {}: {} lines",
        project_id,
        bom.lines.len()
    );

    Ok(success_response(bom))
}

async fn get_bom(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let bom = state
        .services
        .bom
        .get_bom(project_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(bom))
}

pub fn material_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials))
        .route("/:id", get(get_material))
}

pub fn material_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_material))
        .route("/:id", put(update_material))
        .route("/:id", delete(delete_material))
}

pub fn service_item_read_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_service_items))
        .route("/:id", get(get_service_item))
}

pub fn service_item_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_service_item))
        .route("/:id", put(update_service_item))
}

/// BoM routes nested under /projects
pub fn bom_read_routes() -> Router<AppState> {
    Router::new().route("/:id/bom", get(get_bom))
}

pub fn bom_manage_routes() -> Router<AppState> {
    Router::new().route("/:id/bom", put(replace_bom))
}
