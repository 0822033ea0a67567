mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

fn currency(code: &str, name: &str, rate: &str) -> serde_json::Value {
    json!({
        "currency_code": code,
        "currency_name": name,
        "rate": rate,
        "effective_date": "2026-01-01",
    })
}

#[tokio::test]
async fn duplicate_currency_code_returns_conflict() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .post("/api/v1/currencies", &token, currency("USD", "US Dollar", "16500"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/currencies",
            &token,
            currency("USD", "US Dollar again", "16000"),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The original rate is unchanged
    let (_, body) = app.get("/api/v1/currencies", &token).await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["rate"], "16500");
}

#[tokio::test]
async fn bulk_rate_update_is_all_or_nothing() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    app.post("/api/v1/currencies", &token, currency("USD", "US Dollar", "16500"))
        .await;
    app.post("/api/v1/currencies", &token, currency("EUR", "Euro", "17800"))
        .await;

    // One unknown code rolls the whole batch back
    let (status, _) = app
        .put(
            "/api/v1/currencies/rates",
            &token,
            json!({
                "effective_date": "2026-02-01",
                "rates": [
                    { "currency_code": "USD", "rate": "16700" },
                    { "currency_code": "XXX", "rate": "1" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/v1/currencies", &token).await;
    let usd = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["currency_code"] == "USD")
        .unwrap()
        .clone();
    assert_eq!(usd["rate"], "16500");

    // A valid batch applies to every row
    let (status, body) = app
        .put(
            "/api/v1/currencies/rates",
            &token,
            json!({
                "effective_date": "2026-02-01",
                "rates": [
                    { "currency_code": "USD", "rate": "16700" },
                    { "currency_code": "EUR", "rate": "18000" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["updated"], 2);
}

#[tokio::test]
async fn invalid_currency_inputs_are_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    // Non-ISO code length
    let (status, _) = app
        .post("/api/v1/currencies", &token, currency("US", "Short", "1"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Non-positive rate
    let (status, _) = app
        .post("/api/v1/currencies", &token, currency("JPY", "Yen", "0"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
