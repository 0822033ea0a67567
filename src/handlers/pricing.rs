use super::common::{
    created_response, map_service_error, no_content_response, success_response, Json,
};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct DiscountPolicyRequest {
    pub role: String,
    pub max_discount_pct: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct OverheadAllocationRequest {
    pub category: String,
    pub allocation_pct: Decimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentTermRequest {
    pub term_code: String,
    pub description: String,
    pub net_days: i32,
}

#[derive(Debug, Deserialize)]
pub struct PricingRuleRequest {
    pub category: String,
    pub markup_pct: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct PricingRuleListQuery {
    #[serde(default)]
    pub active_only: bool,
}

async fn upsert_discount_policy(
    State(state): State<AppState>,
    Json(payload): Json<DiscountPolicyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .services
        .pricing
        .upsert_discount_policy(payload.role, payload.max_discount_pct)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(serde_json::json!({ "id": id })))
}

async fn list_discount_policies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let policies = state
        .services
        .pricing
        .list_discount_policies()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(policies))
}

async fn delete_discount_policy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .pricing
        .delete_discount_policy(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn upsert_overhead_allocation(
    State(state): State<AppState>,
    Json(payload): Json<OverheadAllocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .services
        .pricing
        .upsert_overhead_allocation(
            payload.category,
            payload.allocation_pct,
            payload.description,
        )
        .await
        .map_err(map_service_error)?;

    Ok(created_response(serde_json::json!({ "id": id })))
}

async fn list_overhead_allocations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let allocations = state
        .services
        .pricing
        .list_overhead_allocations()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(allocations))
}

async fn create_payment_term(
    State(state): State<AppState>,
    Json(payload): Json<PaymentTermRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .services
        .pricing
        .create_payment_term(payload.term_code, payload.description, payload.net_days)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(serde_json::json!({ "id": id })))
}

async fn list_payment_terms(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let terms = state
        .services
        .pricing
        .list_payment_terms()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(terms))
}

async fn delete_payment_term(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .pricing
        .delete_payment_term(id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

async fn upsert_pricing_rule(
    State(state): State<AppState>,
    Json(payload): Json<PricingRuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .services
        .pricing
        .upsert_pricing_rule(payload.category, payload.markup_pct, payload.is_active)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(serde_json::json!({ "id": id })))
}

async fn list_pricing_rules(
    State(state): State<AppState>,
    Query(query): Query<PricingRuleListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rules = state
        .services
        .pricing
        .list_pricing_rules(query.active_only)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(rules))
}

pub fn pricing_read_routes() -> Router<AppState> {
    Router::new()
        .route("/discount-policies", get(list_discount_policies))
        .route("/overhead-allocations", get(list_overhead_allocations))
        .route("/payment-terms", get(list_payment_terms))
        .route("/rules", get(list_pricing_rules))
}

pub fn pricing_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/discount-policies", put(upsert_discount_policy))
        .route("/discount-policies/:id", delete(delete_discount_policy))
        .route("/overhead-allocations", put(upsert_overhead_allocation))
        .route("/payment-terms", axum::routing::post(create_payment_term))
        .route("/payment-terms/:id", delete(delete_payment_term))
        .route("/rules", put(upsert_pricing_rule))
}
