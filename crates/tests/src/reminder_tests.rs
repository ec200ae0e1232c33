use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{citizen, delete, get, lawyer, patch, post, put, test_app, TestUser};

async fn remind(app: &axum::Router, owner: &TestUser, title: &str, due: &str) -> String {
    let (status, body) = post(
        app,
        "/api/v1/reminders",
        owner,
        json!({ "title": title, "dueDate": due, "priority": "high" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create reminder failed: {body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn reminders_are_private_to_their_owner() {
    let (app, _state) = test_app();
    let owner = lawyer(&app, "Mohan", "civil").await;
    let other = citizen(&app, "Nisha").await;
    let id = remind(&app, &owner, "File reply", "2030-03-01T09:00:00Z").await;
    let uri = format!("/api/v1/reminders/{id}");

    for (status, _) in [
        get(&app, &uri, &other).await,
        put(&app, &uri, &other, json!({ "title": "Mine now" })).await,
        patch(&app, &format!("{uri}/toggle"), &other, Value::Null).await,
        delete(&app, &uri, &other).await,
    ] {
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, listed) = get(&app, "/api/v1/reminders", &other).await;
    assert!(listed["data"].as_array().unwrap().is_empty());

    let (status, body) = get(&app, &uri, &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "File reply");
}

#[tokio::test]
async fn toggle_flips_completion_both_ways() {
    let (app, _state) = test_app();
    let owner = citizen(&app, "Omkar").await;
    let id = remind(&app, &owner, "Bring receipts", "2030-01-10T09:00:00Z").await;
    let uri = format!("/api/v1/reminders/{id}/toggle");

    let (_, done) = patch(&app, &uri, &owner, Value::Null).await;
    assert_eq!(done["data"]["completed"], true);
    assert!(done["data"]["completedAt"].is_string());

    let (_, undone) = patch(&app, &uri, &owner, Value::Null).await;
    assert_eq!(undone["data"]["completed"], false);
    assert!(undone["data"]["completedAt"].is_null());
}

#[tokio::test]
async fn listing_is_soonest_first_and_filters_on_completion() {
    let (app, _state) = test_app();
    let owner = citizen(&app, "Pooja").await;
    remind(&app, &owner, "Later", "2030-06-01T09:00:00Z").await;
    let sooner = remind(&app, &owner, "Sooner", "2030-02-01T09:00:00Z").await;
    patch(&app, &format!("/api/v1/reminders/{sooner}/toggle"), &owner, Value::Null).await;

    let (_, all) = get(&app, "/api/v1/reminders", &owner).await;
    let titles: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);

    let (_, open) = get(&app, "/api/v1/reminders?completed=false", &owner).await;
    let open = open["data"].as_array().unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0]["title"], "Later");
}
