mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn login_issues_tokens_for_valid_credentials() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/users",
            &admin,
            json!({
                "email": "finance@example.com",
                "name": "Finance Person",
                "password": "a-long-password",
                "role": "finance",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({
                "email": "finance@example.com",
                "password": "a-long-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    let access = body["access_token"].as_str().unwrap().to_string();
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    // The issued token actually works against the API
    let (status, _) = app.get("/api/v1/accounts", &access).await;
    assert_eq!(status, StatusCode::OK);

    // Refresh rotates the pair; the old refresh token is single use
    let (status, _) = app
        .request(
            Method::POST,
            "/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    app.post(
        "/api/v1/users",
        &admin,
        json!({
            "email": "user@example.com",
            "name": "User",
            "password": "a-long-password",
            "role": "staff",
        }),
    )
    .await;

    let (status, _) = app
        .request(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({
                "email": "user@example.com",
                "password": "wrong-password",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let user = json!({
        "email": "dup@example.com",
        "name": "First",
        "password": "a-long-password",
        "role": "staff",
    });

    let (status, _) = app.post("/api/v1/users", &admin, user.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.post("/api/v1/users", &admin, user).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/users",
            &admin,
            json!({
                "email": "intern@example.com",
                "name": "Intern",
                "password": "a-long-password",
                "role": "intern",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_permissions_gate_mutations() {
    let app = TestApp::new().await;
    let (_, staff_token) = app.user_with_role("staff").await;
    let (_, finance_token) = app.user_with_role("finance").await;

    let account = json!({
        "account_code": "1-2000",
        "account_name": "Receivables",
        "account_type": "Asset",
    });

    // Staff can read but not create accounts
    let (status, _) = app.get("/api/v1/accounts", &staff_token).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .post("/api/v1/accounts", &staff_token, account.clone())
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Finance can create accounts
    let (status, _) = app.post("/api/v1/accounts", &finance_token, account).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn manager_assignment_is_restricted_to_operational_roles() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (manager_id, manager_token) = app.user_with_role("project_manager").await;
    let (_, om_token) = app.user_with_role("operational_manager").await;

    let (_, body) = app
        .post(
            "/api/v1/projects",
            &admin,
            json!({
                "project_code": "PRJ-ASSIGN",
                "name": "Assignment test",
                "client_name": "Client",
            }),
        )
        .await;
    let project = body["data"]["id"].as_str().unwrap().to_string();

    // A project manager cannot assign managers
    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/manager"),
            &manager_token,
            json!({ "manager_id": manager_id }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An operational manager can
    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/manager"),
            &om_token,
            json!({ "manager_id": manager_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}
