mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

async fn seed_project(app: &TestApp, token: &str) -> String {
    let (status, body) = app
        .post(
            "/api/v1/projects",
            token,
            json!({
                "project_code": format!("PRJ-{}", Uuid::new_v4().simple()),
                "name": "Warehouse fit-out",
                "client_name": "PT Nusantara",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn seed_template(app: &TestApp, token: &str) -> String {
    let (status, body) = app
        .post(
            "/api/v1/milestone-templates",
            token,
            json!({
                "name": format!("Standard build {}", Uuid::new_v4().simple()),
                "items": [
                    { "name": "Mobilization", "duration_days": 5 },
                    { "name": "Construction", "duration_days": 10 },
                ],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn template_application_lays_milestones_back_to_back() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (manager_id, manager_token) = app.user_with_role("project_manager").await;

    let project = seed_project(&app, &admin).await;
    let template = seed_template(&app, &admin).await;

    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/manager"),
            &admin,
            json!({ "manager_id": manager_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .post(
            &format!("/api/v1/projects/{project}/milestones/apply-template"),
            &manager_token,
            json!({ "template_id": template }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let milestones = body["data"].as_array().unwrap();
    assert_eq!(milestones.len(), 2);

    // Durations 5 and 10 from day 0: first spans day 0-5, second day 6-16
    let today = Utc::now().date_naive();
    let first_start: NaiveDate = milestones[0]["start_date"].as_str().unwrap().parse().unwrap();
    let first_end: NaiveDate = milestones[0]["end_date"].as_str().unwrap().parse().unwrap();
    let second_start: NaiveDate = milestones[1]["start_date"].as_str().unwrap().parse().unwrap();
    let second_end: NaiveDate = milestones[1]["end_date"].as_str().unwrap().parse().unwrap();

    assert_eq!(first_start, today);
    assert_eq!(first_end, today + Duration::days(5));
    assert_eq!(second_start, today + Duration::days(6));
    assert_eq!(second_end, today + Duration::days(16));
    assert!(second_start > first_end, "milestones must not overlap");

    // The application is recorded in the project's activity trail
    let (_, body) = app
        .get(&format!("/api/v1/projects/{project}/activity"), &admin)
        .await;
    let actions: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert!(actions.contains(&"milestone_template_applied"));
}

#[tokio::test]
async fn only_the_assigned_manager_may_apply_a_template() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (manager_id, _) = app.user_with_role("project_manager").await;
    let (_, other_manager_token) = app.user_with_role("project_manager").await;

    let project = seed_project(&app, &admin).await;
    let template = seed_template(&app, &admin).await;

    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/manager"),
            &admin,
            json!({ "manager_id": manager_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            &format!("/api/v1/projects/{project}/milestones/apply-template"),
            &other_manager_token,
            json!({ "template_id": template }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app
        .get(&format!("/api/v1/projects/{project}/milestones"), &admin)
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn applying_an_unknown_template_returns_not_found() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let project = seed_project(&app, &admin).await;

    let (status, _) = app
        .post(
            &format!("/api/v1/projects/{project}/milestones/apply-template"),
            &admin,
            json!({ "template_id": Uuid::new_v4() }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn template_requires_at_least_one_item() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, _) = app
        .post(
            "/api/v1/milestone-templates",
            &admin,
            json!({ "name": "Empty", "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tasks_carry_progress_bounds() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (manager_id, manager_token) = app.user_with_role("project_manager").await;

    let project = seed_project(&app, &admin).await;
    let template = seed_template(&app, &admin).await;
    app.put(
        &format!("/api/v1/projects/{project}/manager"),
        &admin,
        json!({ "manager_id": manager_id }),
    )
    .await;

    let (_, body) = app
        .post(
            &format!("/api/v1/projects/{project}/milestones/apply-template"),
            &manager_token,
            json!({ "template_id": template }),
        )
        .await;
    let milestone = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            &format!("/api/v1/milestones/{milestone}/tasks"),
            &manager_token,
            json!({ "name": "Pour foundation" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(
            &format!("/api/v1/tasks/{task}"),
            &manager_token,
            json!({ "progress_pct": 140 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/v1/tasks/{task}"),
            &manager_token,
            json!({ "progress_pct": 60, "status": "InProgress" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn project_status_progression_is_enforced() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let project = seed_project(&app, &admin).await;

    // Skipping Planning is rejected
    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/status"),
            &admin,
            json!({ "status": "Execution" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for next in ["Planning", "Execution", "Closing", "Closed"] {
        let (status, _) = app
            .put(
                &format!("/api/v1/projects/{project}/status"),
                &admin,
                json!({ "status": next }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "transition to {next}");
    }

    // Closed is terminal
    let (status, _) = app
        .put(
            &format!("/api/v1/projects/{project}/status"),
            &admin,
            json!({ "status": "Cancelled" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
