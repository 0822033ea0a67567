mod common;

use axum::http::StatusCode;
use common::TestApp;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("/api/v1/pricing/discount-policies", json!({ "role": "sales", "max_discount_pct": "120" }))]
#[case("/api/v1/pricing/discount-policies", json!({ "role": "sales", "max_discount_pct": "-5" }))]
#[case("/api/v1/pricing/overhead-allocations", json!({ "category": "HPP", "allocation_pct": "101" }))]
#[case("/api/v1/pricing/rules", json!({ "category": "steel", "markup_pct": "250" }))]
#[tokio::test]
async fn percentages_outside_bounds_are_rejected(
    #[case] uri: &str,
    #[case] body: serde_json::Value,
) {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app.put(uri, &token, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn discount_policy_upsert_overwrites_existing_role() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .put(
            "/api/v1/pricing/discount-policies",
            &token,
            json!({ "role": "sales", "max_discount_pct": "10" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .put(
            "/api/v1/pricing/discount-policies",
            &token,
            json!({ "role": "sales", "max_discount_pct": "15" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get("/api/v1/pricing/discount-policies", &token).await;
    let policies = body["data"].as_array().unwrap();
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0]["max_discount_pct"], "15");
}

#[tokio::test]
async fn boundary_percentages_are_accepted() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    for pct in ["0", "100"] {
        let (status, _) = app
            .put(
                "/api/v1/pricing/rules",
                &token,
                json!({ "category": format!("cat-{pct}"), "markup_pct": pct }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "markup of {pct} should pass");
    }
}

#[tokio::test]
async fn duplicate_payment_term_code_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let term = json!({
        "term_code": "NET30",
        "description": "Payable within 30 days",
        "net_days": 30,
    });

    let (status, _) = app
        .post("/api/v1/pricing/payment-terms", &token, term.clone())
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post("/api/v1/pricing/payment-terms", &token, term)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn negative_net_days_is_rejected() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/pricing/payment-terms",
            &token,
            json!({
                "term_code": "NET-NEG",
                "description": "Invalid",
                "net_days": -1,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inactive_rules_are_filtered_out() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;

    app.put(
        "/api/v1/pricing/rules",
        &token,
        json!({ "category": "steel", "markup_pct": "20", "is_active": true }),
    )
    .await;
    app.put(
        "/api/v1/pricing/rules",
        &token,
        json!({ "category": "legacy", "markup_pct": "5", "is_active": false }),
    )
    .await;

    let (_, body) = app
        .get("/api/v1/pricing/rules?active_only=true", &token)
        .await;
    let rules = body["data"].as_array().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0]["category"], "steel");
}
