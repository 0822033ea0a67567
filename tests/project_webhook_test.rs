mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::TestApp;
use meridian_erp::webhooks::SignatureGenerator;
use serde_json::{json, Value};
use tower::ServiceExt;

fn won_order_body(order_id: &str) -> String {
    json!({
        "order_id": order_id,
        "client_name": "PT Cahaya Abadi",
        "project_name": "Head office renovation",
        "contract_value": "250000.00",
    })
    .to_string()
}

async fn send_webhook(
    app: &TestApp,
    body: String,
    headers: &[(&str, String)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/events/project-won")
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, value);
    }

    let response = app
        .router()
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn won_order_materializes_a_project() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = send_webhook(&app, won_order_body("SO-2026-001"), &[]).await;
    assert_eq!(status, StatusCode::OK);
    let project_id = body["data"]["project_id"].as_str().unwrap().to_string();

    let (status, body) = app.get(&format!("/api/v1/projects/{project_id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "New");
    assert_eq!(body["data"]["client_name"], "PT Cahaya Abadi");
    assert_eq!(body["data"]["source_order_id"], "SO-2026-001");
}

#[tokio::test]
async fn repeated_delivery_is_idempotent() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (_, first) = send_webhook(&app, won_order_body("SO-2026-777"), &[]).await;
    let (_, second) = send_webhook(&app, won_order_body("SO-2026-777"), &[]).await;
    assert_eq!(first["data"]["project_id"], second["data"]["project_id"]);

    let (_, body) = app
        .get("/api/v1/projects?search=renovation", &admin)
        .await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn signed_webhook_rejects_bad_signatures() {
    let app = TestApp::with_config(|cfg| {
        cfg.project_won_webhook_secret = Some("wh-secret".to_string());
    })
    .await;

    let body = won_order_body("SO-2026-900");
    let timestamp = chrono::Utc::now().timestamp().to_string();

    // No signature headers
    let (status, _) = send_webhook(&app, body.clone(), &[]).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Wrong secret
    let bad = SignatureGenerator::new("not-the-secret".into()).sign_payload(&timestamp, &body);
    let (status, _) = send_webhook(
        &app,
        body.clone(),
        &[("x-timestamp", timestamp.clone()), ("x-signature", bad)],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Correct signature
    let good = SignatureGenerator::new("wh-secret".into()).sign_payload(&timestamp, &body);
    let (status, _) = send_webhook(
        &app,
        body,
        &[("x-timestamp", timestamp), ("x-signature", good)],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn empty_order_id_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = send_webhook(&app, won_order_body("  "), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_payload_is_rejected() {
    let app = TestApp::new().await;

    let (status, _) = send_webhook(&app, "{not json".to_string(), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
