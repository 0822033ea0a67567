mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

async fn seed_accounts(app: &TestApp, token: &str) -> (String, String, String) {
    let mut ids = Vec::new();
    for (code, name, kind) in [
        ("1-1000", "Cash", "Asset"),
        ("4-1000", "Service Revenue", "Revenue"),
        ("6-1000", "Office Expense", "Expense"),
    ] {
        let (status, body) = app
            .post(
                "/api/v1/accounts",
                token,
                json!({
                    "account_code": code,
                    "account_name": name,
                    "account_type": kind,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }
    (ids.remove(0), ids.remove(0), ids.remove(0))
}

#[tokio::test]
async fn balanced_transaction_is_accepted() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (cash, revenue, _) = seed_accounts(&app, &token).await;

    // Debits [100, 50] against credits [150] balance exactly
    let (status, body) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-01",
                "description": "Invoice settlement",
                "lines": [
                    { "account_id": cash, "debit": "100.00" },
                    { "account_id": cash, "debit": "50.00" },
                    { "account_id": revenue, "credit": "150.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let txn_id = body["data"]["transaction_id"].as_str().unwrap().to_string();
    let (status, body) = app
        .get(&format!("/api/v1/journal/transactions/{txn_id}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unbalanced_transaction_is_rejected_with_difference() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (cash, revenue, _) = seed_accounts(&app, &token).await;

    // Credits [140] against debits [100, 50]: off by 10
    let (status, body) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-01",
                "description": "Unbalanced",
                "lines": [
                    { "account_id": cash, "debit": "100.00" },
                    { "account_id": cash, "debit": "50.00" },
                    { "account_id": revenue, "credit": "140.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("10"));

    // Nothing was written
    let (_, body) = app.get("/api/v1/journal/entries", &token).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn line_with_both_debit_and_credit_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (cash, revenue, _) = seed_accounts(&app, &token).await;

    let (status, _) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-01",
                "description": "Both sides on one line",
                "lines": [
                    { "account_id": cash, "debit": "100.00", "credit": "100.00" },
                    { "account_id": revenue, "credit": "100.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn transaction_referencing_unknown_account_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (cash, _, _) = seed_accounts(&app, &token).await;

    let (status, _) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-01",
                "description": "Ghost account",
                "lines": [
                    { "account_id": cash, "debit": "75.00" },
                    { "account_id": Uuid::new_v4(), "credit": "75.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get("/api/v1/journal/entries", &token).await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn entries_can_be_filtered_by_account() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (cash, revenue, expense) = seed_accounts(&app, &token).await;

    for _ in 0..2 {
        let (status, _) = app
            .post(
                "/api/v1/journal/transactions",
                &token,
                json!({
                    "transaction_date": "2026-03-02",
                    "description": "Recurring revenue",
                    "lines": [
                        { "account_id": cash, "debit": "40.00" },
                        { "account_id": revenue, "credit": "40.00" },
                    ],
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = app
        .get(&format!("/api/v1/journal/entries?account_id={cash}"), &token)
        .await;
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = app
        .get(
            &format!("/api/v1/journal/entries?account_id={expense}"),
            &token,
        )
        .await;
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn reports_reflect_posted_transactions() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let (cash, revenue, expense) = seed_accounts(&app, &token).await;

    let (status, _) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-05",
                "description": "Consulting engagement",
                "lines": [
                    { "account_id": cash, "debit": "500.00" },
                    { "account_id": revenue, "credit": "500.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/v1/journal/transactions",
            &token,
            json!({
                "transaction_date": "2026-03-06",
                "description": "Office supplies",
                "lines": [
                    { "account_id": expense, "debit": "120.00" },
                    { "account_id": cash, "credit": "120.00" },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.get("/api/v1/reports/trial-balance", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_debit"], "620.00");
    assert_eq!(body["data"]["total_credit"], "620.00");

    let (status, body) = app
        .get(
            "/api/v1/reports/income-statement?from=2026-03-01&to=2026-03-31",
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_revenue"], "500.00");
    assert_eq!(body["data"]["total_expense"], "120.00");
    assert_eq!(body["data"]["net_income"], "380.00");
}
