use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meridian ERP API",
        version = "1.0.0",
        description = r#"
# Meridian ERP API

Backend for the Meridian ERP suite: finance (chart of accounts, journal,
payables, reports), procurement (vendors, purchase orders, goods
receipts), projects (milestones, templates, tasks), engineering catalog
(materials, services, BoM), pricing rules, and identity.

## Authentication

All API endpoints require a JWT bearer token:

```
Authorization: Bearer <your-jwt-token>
```

Obtain tokens via `POST /auth/login`; refresh via `POST /auth/refresh`.

## Pagination

List endpoints accept `page` (default 1) and `limit` (default 10,
max 100) and return `{ items, total, page, limit, total_pages }`.

## Errors

Failed requests return a consistent error body with the HTTP status
category, a human-readable message, a request id, and a timestamp.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    components(schemas(
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "Finance", description = "Chart of accounts, journal, payables, reports"),
        (name = "Procurement", description = "Vendors, purchase orders, goods receipts"),
        (name = "Projects", description = "Projects, milestones, templates, tasks"),
        (name = "Catalog", description = "Materials, service items, bills of materials"),
        (name = "Pricing", description = "Discount, overhead, payment term, and markup rules"),
        (name = "Identity", description = "Users and authentication"),
        (name = "Health", description = "Health and status endpoints")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
