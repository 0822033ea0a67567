use super::common::{
    Json, created_response, map_service_error, success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::currencies::{CreateCurrencyInput, RateUpdateInput},
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCurrencyRequest {
    #[validate(length(min = 3, max = 3))]
    pub currency_code: String,
    #[validate(length(min = 1))]
    pub currency_name: String,
    pub rate: Decimal,
    pub effective_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct RateUpdateRequest {
    pub currency_code: String,
    pub rate: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct BulkRateUpdateRequest {
    pub effective_date: NaiveDate,
    pub rates: Vec<RateUpdateRequest>,
}

async fn create_currency(
    State(state): State<AppState>,
    Json(payload): Json<CreateCurrencyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let id = state
        .services
        .currencies
        .create_currency(CreateCurrencyInput {
            currency_code: payload.currency_code,
            currency_name: payload.currency_name,
            rate: payload.rate,
            effective_date: payload.effective_date,
        })
        .await
        .map_err(map_service_error)?;

    info!("Currency registered: {}", id);

    Ok(created_response(serde_json::json!({ "id": id })))
}

async fn list_currencies(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let currencies = state
        .services
        .currencies
        .list_currencies()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(currencies))
}

/// Bulk exchange-rate update; all rows commit or none do
async fn bulk_update_rates(
    State(state): State<AppState>,
    Json(payload): Json<BulkRateUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .services
        .currencies
        .bulk_update_rates(
            payload
                .rates
                .into_iter()
                .map(|rate| RateUpdateInput {
                    currency_code: rate.currency_code,
                    rate: rate.rate,
                })
                .collect(),
            payload.effective_date,
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({ "updated": updated })))
}

pub fn currency_read_routes() -> Router<AppState> {
    Router::new().route("/", get(list_currencies))
}

pub fn currency_manage_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_currency))
        .route("/rates", put(bulk_update_rates))
}
