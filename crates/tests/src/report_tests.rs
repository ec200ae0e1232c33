use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{citizen, create_case, delete, get, kind, lawyer, patch, post, put, test_app, TestUser};

async fn draft(app: &axum::Router, author: &TestUser, case_id: Option<&str>) -> String {
    let (status, body) = post(
        app,
        "/api/v1/reports",
        author,
        json!({
            "title": "Liability analysis",
            "content": "The landlord is liable for the repairs.",
            "reportType": "legal_analysis",
            "caseId": case_id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create report failed: {body}");
    assert_eq!(body["data"]["status"], "draft");
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn read_grant_allows_viewing_but_not_editing() {
    let (app, _state) = test_app();
    let author = lawyer(&app, "Qadir", "property").await;
    let reader = citizen(&app, "Radha").await;
    let id = draft(&app, &author, None).await;
    let uri = format!("/api/v1/reports/{id}");

    let (status, _) = get(&app, &uri, &reader).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let share = |permission: &'static str| {
        json!({ "principal": { "kind": "citizen", "id": reader.id }, "permission": permission })
    };
    let (status, _) = post(&app, &format!("{uri}/share"), &author, share("read")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &uri, &reader).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = put(&app, &uri, &reader, json!({ "content": "Rewritten" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(kind(&body), "Forbidden");

    let (status, body) = post(&app, &format!("{uri}/share"), &author, share("edit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sharedWith"].as_array().unwrap().len(), 1);

    let (status, body) = put(&app, &uri, &reader, json!({ "content": "Rewritten" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"], "Rewritten");

    let (status, _) = delete(&app, &uri, &reader).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn finalize_is_one_way_and_owner_only() {
    let (app, _state) = test_app();
    let author = lawyer(&app, "Sanjay", "civil").await;
    let editor = lawyer(&app, "Tanvi", "civil").await;
    let id = draft(&app, &author, None).await;
    let uri = format!("/api/v1/reports/{id}");
    post(
        &app,
        &format!("{uri}/share"),
        &author,
        json!({ "principal": { "kind": "lawyer", "id": editor.id }, "permission": "edit" }),
    )
    .await;

    let (status, _) = patch(&app, &format!("{uri}/finalize"), &editor, Value::Null).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = patch(&app, &format!("{uri}/finalize"), &author, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "final");

    let (status, body) = patch(&app, &format!("{uri}/finalize"), &author, Value::Null).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "InvalidStateTransition");

    let (status, _) = put(&app, &uri, &editor, json!({ "content": "Late edit" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = put(&app, &uri, &editor, json!({ "title": "Retitled" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn final_report_metadata_is_frozen_for_editors() {
    let (app, _state) = test_app();
    let author = lawyer(&app, "Sunita", "civil").await;
    let editor = lawyer(&app, "Tarun", "civil").await;
    let client = citizen(&app, "Usha").await;
    // Open and unassigned, so the editor may link it.
    let case_id = create_case(&app, &client, "Boundary wall").await;
    let id = draft(&app, &author, None).await;
    let uri = format!("/api/v1/reports/{id}");
    let (status, _) = post(
        &app,
        &format!("{uri}/share"),
        &author,
        json!({ "principal": { "kind": "lawyer", "id": editor.id }, "permission": "edit" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Editing rights hold while the report is a draft.
    let (status, _) = put(&app, &uri, &editor, json!({ "tags": ["draft-note"] })).await;
    assert_eq!(status, StatusCode::OK);
    patch(&app, &format!("{uri}/finalize"), &author, Value::Null).await;

    for edit in [
        json!({ "title": "Taken over" }),
        json!({ "reportType": "other" }),
        json!({ "tags": ["moved"] }),
        json!({ "caseName": "Another matter" }),
        json!({ "caseId": case_id }),
    ] {
        let (status, body) = put(&app, &uri, &editor, edit).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{body}");
    }

    let (_, body) = get(&app, &uri, &author).await;
    assert_eq!(body["data"]["title"], "Liability analysis");
    assert_eq!(body["data"]["reportType"], "legal_analysis");
    assert_eq!(body["data"]["tags"], json!(["draft-note"]));
    assert!(body["data"]["caseId"].is_null());

    let (status, body) = put(&app, &uri, &author, json!({ "title": "Final findings" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Final findings");
}

#[tokio::test]
async fn final_case_report_reaches_the_client() {
    let (app, _state) = test_app();
    let client = citizen(&app, "Uma").await;
    let counsel = lawyer(&app, "Vikram", "civil").await;
    let case_id = create_case(&app, &client, "Water damage").await;
    put(&app, &format!("/api/v1/cases/{case_id}/assign"), &counsel, json!({ "action": "accept" })).await;

    let id = draft(&app, &counsel, Some(&case_id)).await;

    let (_, shared) = get(&app, "/api/v1/reports/shared/all", &client).await;
    assert!(shared["data"].as_array().unwrap().is_empty());

    patch(&app, &format!("/api/v1/reports/{id}/finalize"), &counsel, Value::Null).await;

    let (_, shared) = get(&app, "/api/v1/reports/shared/all", &client).await;
    let shared = shared["data"].as_array().unwrap();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0]["id"], id.as_str());

    let (status, _) = get(&app, "/api/v1/reports/shared/all", &counsel).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
