use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IncomeStatementQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Trial balance across all accounts, computed at query time
async fn trial_balance(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .trial_balance()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Income statement over a date range
async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<IncomeStatementQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .income_statement(query.from, query.to)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/trial-balance", get(trial_balance))
        .route("/income-statement", get(income_statement))
}
