mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

fn account_body(code: &str, name: &str) -> serde_json::Value {
    json!({
        "account_code": code,
        "account_name": name,
        "account_type": "Asset",
    })
}

#[tokio::test]
async fn create_and_fetch_account() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, body) = app
        .post("/api/v1/accounts", &token, account_body("1-1000", "Cash"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/v1/accounts/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["account_code"], "1-1000");
    assert_eq!(body["data"]["account_type"], "Asset");
}

#[tokio::test]
async fn duplicate_account_code_returns_conflict() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .post("/api/v1/accounts", &token, account_body("1-1000", "Cash"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/accounts",
            &token,
            account_body("1-1000", "Cash again"),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The original row is unchanged
    let (status, body) = app.get("/api/v1/accounts?search=1-1000", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["account_name"], "Cash");
}

#[tokio::test]
async fn missing_required_field_returns_bad_request() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/accounts",
            &token,
            json!({ "account_name": "No code" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/v1/accounts", &token).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn unknown_account_returns_not_found() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .get(
            "/api/v1/accounts/00000000-0000-0000-0000-000000000000",
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pagination_limits_items_and_reports_total_pages() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for i in 0..25 {
        let (status, _) = app
            .post(
                "/api/v1/accounts",
                &token,
                account_body(&format!("1-{:04}", i), &format!("Account {i}")),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/v1/accounts?page=1&limit=10", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"]["total"], 25);
    assert_eq!(body["data"]["total_pages"], 3);

    let (_, body) = app.get("/api/v1/accounts?page=3&limit=10", &token).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn delete_account_with_journal_entries_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (_, cash) = app
        .post("/api/v1/accounts", &token, account_body("1-1000", "Cash"))
        .await;
    let (_, revenue) = app
        .post(
            "/api/v1/accounts",
            &token,
            json!({
                "account_code": "4-1000",
                "account_name": "Revenue",
                "account_type": "Revenue",
            }),
        )
        .await;
    let cash_id = cash["data"]["id"].as_str().unwrap().to_string();
    let revenue_id = revenue["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-01",
                "description": "Cash sale",
                "lines": [
                    { "account_id": cash_id, "debit": "250.00" },
                    { "account_id": revenue_id, "credit": "250.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .delete(&format!("/api/v1/accounts/{cash_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("cannot be deleted"));

    // Row remains
    let (status, _) = app.get(&format!("/api/v1/accounts/{cash_id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(Method::GET, "/api/v1/accounts", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
