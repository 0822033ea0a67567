mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

async fn seed_vendor(app: &TestApp, token: &str) -> String {
    let (status, body) = app
        .post(
            "/api/v1/vendors",
            token,
            json!({
                "vendor_name": "Baja Steel Works",
                "classification": "Material",
                "is_preferred": true,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn seed_po(app: &TestApp, token: &str, vendor_id: &str, total: &str) -> String {
    let (status, body) = app
        .post(
            "/api/v1/purchase-orders",
            token,
            json!({
                "po_number": format!("PO-{}", uuid::Uuid::new_v4().simple()),
                "vendor_id": vendor_id,
                "order_date": "2026-02-01",
                "total_amount": total,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn invoice_without_po_is_not_matched() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let vendor = seed_vendor(&app, &token).await;

    let (status, body) = app
        .post(
            "/api/v1/payables",
            &token,
            json!({
                "invoice_number": "INV-001",
                "vendor_id": vendor,
                "invoice_date": "2026-02-10",
                "due_date": "2026-03-10",
                "amount": "1000.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = app.get(&format!("/api/v1/payables/{id}"), &token).await;
    assert_eq!(body["data"]["matching_status"], "NotMatched");
    assert_eq!(body["data"]["status"], "Draft");
}

#[tokio::test]
async fn matching_status_follows_goods_receipts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let vendor = seed_vendor(&app, &token).await;
    let po = seed_po(&app, &token, &vendor, "1000.00").await;

    let (status, body) = app
        .post(
            "/api/v1/payables",
            &token,
            json!({
                "invoice_number": "INV-100",
                "vendor_id": vendor,
                "purchase_order_id": po,
                "invoice_date": "2026-02-10",
                "due_date": "2026-03-10",
                "amount": "1000.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let payable = body["data"]["id"].as_str().unwrap().to_string();

    // No receipts yet
    let (_, body) = app.get(&format!("/api/v1/payables/{payable}"), &token).await;
    assert_eq!(body["data"]["matching_status"], "NotMatched");

    // Partial receipt covers less than the invoice
    let (status, _) = app
        .post(
            &format!("/api/v1/purchase-orders/{po}/receipts"),
            &token,
            json!({
                "gr_number": "GR-1",
                "received_date": "2026-02-15",
                "received_amount": "400.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get(&format!("/api/v1/payables/{payable}"), &token).await;
    assert_eq!(body["data"]["matching_status"], "PartiallyMatched");

    // Remaining receipt completes the match
    let (status, _) = app
        .post(
            &format!("/api/v1/purchase-orders/{po}/receipts"),
            &token,
            json!({
                "gr_number": "GR-2",
                "received_date": "2026-02-20",
                "received_amount": "600.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get(&format!("/api/v1/payables/{payable}"), &token).await;
    assert_eq!(body["data"]["matching_status"], "Matched");
}

#[tokio::test]
async fn over_billed_invoice_never_matches() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let vendor = seed_vendor(&app, &token).await;
    let po = seed_po(&app, &token, &vendor, "500.00").await;

    let (status, body) = app
        .post(
            "/api/v1/payables",
            &token,
            json!({
                "invoice_number": "INV-OVER",
                "vendor_id": vendor,
                "purchase_order_id": po,
                "invoice_date": "2026-02-10",
                "due_date": "2026-03-10",
                "amount": "750.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let payable = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            &format!("/api/v1/purchase-orders/{po}/receipts"),
            &token,
            json!({
                "gr_number": "GR-OVER",
                "received_date": "2026-02-15",
                "received_amount": "500.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = app.get(&format!("/api/v1/payables/{payable}"), &token).await;
    assert_eq!(body["data"]["matching_status"], "NotMatched");
}

#[tokio::test]
async fn duplicate_invoice_number_for_vendor_conflicts() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let vendor = seed_vendor(&app, &token).await;

    let invoice = json!({
        "invoice_number": "INV-DUP",
        "vendor_id": vendor,
        "invoice_date": "2026-02-10",
        "due_date": "2026-03-10",
        "amount": "100.00",
    });

    let (status, _) = app.post("/api/v1/payables", &token, invoice.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/api/v1/payables", &token, invoice).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn payable_lifecycle_and_payments() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let vendor = seed_vendor(&app, &token).await;

    let (_, body) = app
        .post(
            "/api/v1/payables",
            &token,
            json!({
                "invoice_number": "INV-LIFE",
                "vendor_id": vendor,
                "invoice_date": "2026-02-10",
                "due_date": "2026-03-10",
                "amount": "300.00",
            }),
        )
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Payments are rejected while the payable is still a draft
    let (status, _) = app
        .post(
            &format!("/api/v1/payables/{id}/payments"),
            &token,
            json!({ "amount": "100.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/v1/payables/{id}/status"),
            &token,
            json!({ "status": "Approved" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Partial payment
    let (status, body) = app
        .post(
            &format!("/api/v1/payables/{id}/payments"),
            &token,
            json!({ "amount": "100.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PartiallyPaid");

    // Overpayment is rejected
    let (status, _) = app
        .post(
            &format!("/api/v1/payables/{id}/payments"),
            &token,
            json!({ "amount": "500.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Settle the rest
    let (status, body) = app
        .post(
            &format!("/api/v1/payables/{id}/payments"),
            &token,
            json!({ "amount": "200.00" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Paid");

    // A paid invoice cannot move back to dispute
    let (status, _) = app
        .put(
            &format!("/api/v1/payables/{id}/status"),
            &token,
            json!({ "status": "Dispute" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dispute_releases_back_to_approved() {
    let app = TestApp::new().await;
    let token = app.admin_token().await;
    let vendor = seed_vendor(&app, &token).await;

    let (_, body) = app
        .post(
            "/api/v1/payables",
            &token,
            json!({
                "invoice_number": "INV-DISP",
                "vendor_id": vendor,
                "invoice_date": "2026-02-10",
                "due_date": "2026-03-10",
                "amount": "300.00",
            }),
        )
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    for (next, expected) in [
        ("Dispute", StatusCode::OK),
        ("Approved", StatusCode::OK),
        ("Paid", StatusCode::OK),
        ("Approved", StatusCode::BAD_REQUEST),
    ] {
        let (status, _) = app
            .put(
                &format!("/api/v1/payables/{id}/status"),
                &token,
                json!({ "status": next }),
            )
            .await;
        assert_eq!(status, expected, "transition to {next}");
    }
}
