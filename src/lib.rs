//! Meridian ERP API Library
//!
//! Backend for the Meridian ERP suite: finance, procurement, project,
//! engineering catalog, and identity domains behind one REST surface.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod metrics;
pub mod middleware_helpers;
pub mod notifications;
pub mod openapi;
pub mod services;
pub mod tracing;
pub mod webhooks;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::auth::consts as perm;
use crate::auth::AuthRouterExt;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<db::DbPool>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// Common response envelope
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(limit.max(1))
        };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// All v1 API routes with permission gating from the central policy table
pub fn api_v1_routes() -> Router<AppState> {
    // Finance
    let accounts_read =
        handlers::accounts::account_read_routes().with_permission(perm::ACCOUNTS_READ);
    let accounts_manage =
        handlers::accounts::account_manage_routes().with_permission(perm::ACCOUNTS_MANAGE);
    let journal_read = handlers::journal::journal_read_routes().with_permission(perm::JOURNAL_READ);
    let journal_post = handlers::journal::journal_post_routes().with_permission(perm::JOURNAL_POST);
    let payables_read =
        handlers::payables::payable_read_routes().with_permission(perm::PAYABLES_READ);
    let payables_manage =
        handlers::payables::payable_manage_routes().with_permission(perm::PAYABLES_MANAGE);
    let currencies_read =
        handlers::currencies::currency_read_routes().with_permission(perm::CURRENCIES_READ);
    let currencies_manage =
        handlers::currencies::currency_manage_routes().with_permission(perm::CURRENCIES_MANAGE);
    let reports = handlers::reports::report_routes().with_permission(perm::REPORTS_READ);

    // Procurement
    let vendors_read = handlers::vendors::vendor_read_routes().with_permission(perm::VENDORS_READ);
    let vendors_manage =
        handlers::vendors::vendor_manage_routes().with_permission(perm::VENDORS_MANAGE);
    let procurement_read =
        handlers::procurement::procurement_read_routes().with_permission(perm::PROCUREMENT_READ);
    let procurement_manage = handlers::procurement::procurement_manage_routes()
        .with_permission(perm::PROCUREMENT_MANAGE);

    // Projects
    let projects_read =
        handlers::projects::project_read_routes().with_permission(perm::PROJECTS_READ);
    let projects_manage =
        handlers::projects::project_manage_routes().with_permission(perm::PROJECTS_MANAGE);
    let projects_assign =
        handlers::projects::project_assign_routes().with_permission(perm::PROJECTS_ASSIGN_MANAGER);
    let project_milestones = handlers::milestones::project_milestone_routes()
        .with_permission(perm::MILESTONES_MANAGE);
    let templates =
        handlers::milestones::template_routes().with_permission(perm::MILESTONES_MANAGE);
    let milestones = handlers::milestones::milestone_routes().with_permission(perm::TASKS_MANAGE);
    let tasks = handlers::milestones::task_routes().with_permission(perm::TASKS_MANAGE);

    // Engineering catalog
    let materials_read =
        handlers::catalog::material_read_routes().with_permission(perm::CATALOG_READ);
    let materials_manage =
        handlers::catalog::material_manage_routes().with_permission(perm::CATALOG_MANAGE);
    let service_items_read =
        handlers::catalog::service_item_read_routes().with_permission(perm::CATALOG_READ);
    let service_items_manage =
        handlers::catalog::service_item_manage_routes().with_permission(perm::CATALOG_MANAGE);
    let bom_read = handlers::catalog::bom_read_routes().with_permission(perm::CATALOG_READ);
    let bom_manage = handlers::catalog::bom_manage_routes().with_permission(perm::BOM_MANAGE);

    // Pricing rules
    let pricing_read = handlers::pricing::pricing_read_routes().with_permission(perm::PRICING_READ);
    let pricing_manage =
        handlers::pricing::pricing_manage_routes().with_permission(perm::PRICING_MANAGE);

    // Identity
    let users_read = handlers::users::user_read_routes().with_permission(perm::USERS_READ);
    let users_manage = handlers::users::user_manage_routes().with_permission(perm::USERS_MANAGE);

    Router::new()
        // Status and health endpoints
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        // Finance
        .nest("/accounts", accounts_read.merge(accounts_manage))
        .nest("/journal", journal_read.merge(journal_post))
        .nest("/payables", payables_read.merge(payables_manage))
        .nest("/currencies", currencies_read.merge(currencies_manage))
        .nest("/reports", reports)
        // Procurement
        .nest("/vendors", vendors_read.merge(vendors_manage))
        .nest(
            "/purchase-orders",
            procurement_read.merge(procurement_manage),
        )
        // Projects
        .nest(
            "/projects",
            projects_read
                .merge(projects_manage)
                .merge(projects_assign)
                .merge(project_milestones)
                .merge(bom_read)
                .merge(bom_manage),
        )
        .nest("/milestone-templates", templates)
        .nest("/milestones", milestones)
        .nest("/tasks", tasks)
        // Engineering catalog
        .nest("/materials", materials_read.merge(materials_manage))
        .nest(
            "/service-items",
            service_items_read.merge(service_items_manage),
        )
        // Pricing rules
        .nest("/pricing", pricing_read.merge(pricing_manage))
        // Identity
        .nest("/users", users_read.merge(users_manage))
}

/// Inbound cross-service webhooks; signature-verified, no bearer auth
pub fn event_routes() -> Router<AppState> {
    Router::new().route(
        "/project-won",
        axum::routing::post(handlers::projects::project_won_webhook),
    )
}

async fn api_status() -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let version = env!("CARGO_PKG_VERSION");
    let status_data = json!({
        "status": "ok",
        "version": version,
        "service": "meridian-erp",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, errors::ServiceError> {
    let db_status = match state.db.ping().await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        assert!(response.success);
        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[test]
    fn pagination_math_matches_ceiling_division() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 25, 1, 10);
        assert_eq!(page.total_pages, 3);

        let page = PaginatedResponse::new(Vec::<i32>::new(), 0, 1, 10);
        assert_eq!(page.total_pages, 0);

        let page = PaginatedResponse::new(vec![1], 10, 1, 10);
        assert_eq!(page.total_pages, 1);
    }
}
