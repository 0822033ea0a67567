mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

async fn seed_catalog(app: &TestApp, token: &str) -> (String, String) {
    let (status, body) = app
        .post(
            "/api/v1/materials",
            token,
            json!({
                "code": "MAT-001",
                "name": "Rebar 10mm",
                "unit": "kg",
                "unit_price": "12.50",
                "category": "steel",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let material = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/service-items",
            token,
            json!({
                "code": "SVC-001",
                "name": "Welding labor",
                "unit": "hour",
                "unit_price": "30.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let service = body["data"]["id"].as_str().unwrap().to_string();

    (material, service)
}

async fn seed_project(app: &TestApp, token: &str) -> String {
    let (_, body) = app
        .post(
            "/api/v1/projects",
            token,
            json!({
                "project_code": format!("PRJ-{}", Uuid::new_v4().simple()),
                "name": "Bridge repair",
                "client_name": "City works",
            }),
        )
        .await;
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn bom_replacement_is_atomic_and_snapshots_prices() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (material, service) = seed_catalog(&app, &token).await;
    let project = seed_project(&app, &token).await;

    let (status, body) = app
        .put(
            &format!("/api/v1/projects/{project}/bom"),
            &token,
            json!({
                "lines": [
                    { "material_id": material, "quantity": "100" },
                    { "service_item_id": service, "quantity": "8" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 2);
    // 100 * 12.50 + 8 * 30.00
    assert_eq!(body["data"]["total"], "1490.00");

    // Replacement removes the old lines entirely
    let (status, body) = app
        .put(
            &format!("/api/v1/projects/{project}/bom"),
            &token,
            json!({
                "lines": [
                    { "material_id": material, "quantity": "10" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["total"], "125.00");

    let (_, body) = app
        .get(&format!("/api/v1/projects/{project}/bom"), &token)
        .await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn bom_line_must_reference_exactly_one_catalog_item() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (material, service) = seed_catalog(&app, &token).await;
    let project = seed_project(&app, &token).await;

    // Both references on one line
    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/bom"),
            &token,
            json!({
                "lines": [
                    { "material_id": material, "service_item_id": service, "quantity": "1" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Neither reference
    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/bom"),
            &token,
            json!({ "lines": [ { "quantity": "1" } ] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A failed replacement leaves no lines behind
    let (_, body) = app
        .get(&format!("/api/v1/projects/{project}/bom"), &token)
        .await;
    assert!(body["data"]["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn material_referenced_by_bom_cannot_be_deleted() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (material, _) = seed_catalog(&app, &token).await;
    let project = seed_project(&app, &token).await;

    app.put(
        &format!("/api/v1/projects/{project}/bom"),
        &token,
        json!({ "lines": [ { "material_id": material, "quantity": "5" } ] }),
    )
    .await;

    let (status, _) = app
        .delete(&format!("/api/v1/materials/{material}"), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_material_code_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    seed_catalog(&app, &token).await;

    let (status, _) = app
        .post(
            "/api/v1/materials",
            &token,
            json!({
                "code": "MAT-001",
                "name": "Duplicate",
                "unit": "kg",
                "unit_price": "1.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn bom_for_unknown_project_returns_not_found() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .get(
            &format!("/api/v1/projects/{}/bom", Uuid::new_v4()),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
