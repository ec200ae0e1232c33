use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{citizen, create_case, get, kind, lawyer, patch, post, put, test_app};

fn ids(list: &Value) -> Vec<String> {
    list["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn accepted_case_moves_in_progress_and_joins_lawyer_list() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Anu").await;
    let l = lawyer(&app, "Bala", "civil").await;
    let case_id = create_case(&app, &c, "Boundary wall").await;

    let (status, body) = get(&app, &format!("/api/v1/cases/{case_id}"), &c).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["lawyer"], Value::Null);

    let (status, body) = put(
        &app,
        &format!("/api/v1/cases/{case_id}/assign"),
        &l,
        json!({ "action": "accept" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["applied"], true);
    assert_eq!(body["data"]["record"]["status"], "in progress");
    assert_eq!(body["data"]["record"]["lawyer"], l.id.as_str());

    let (_, mine) = get(&app, "/api/v1/lawyer/cases", &l).await;
    assert_eq!(ids(&mine), vec![case_id]);
}

#[tokio::test]
async fn accept_replay_is_a_no_op() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Chitra").await;
    let l = lawyer(&app, "Dinesh", "civil").await;
    let case_id = create_case(&app, &c, "Lease").await;
    let uri = format!("/api/v1/cases/{case_id}/assign");

    let (_, first) = put(&app, &uri, &l, json!({ "action": "accept" })).await;
    let (status, second) = put(&app, &uri, &l, json!({ "action": "accept" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["applied"], false);
    assert_eq!(second["data"]["record"], first["data"]["record"]);

    let (_, profile) = get(&app, "/api/v1/lawyer/profile", &l).await;
    assert_eq!(profile["data"]["assignedCaseCount"], 1);
}

#[tokio::test]
async fn second_lawyer_cannot_take_an_accepted_case() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Esha").await;
    let first = lawyer(&app, "Farhan", "civil").await;
    let second = lawyer(&app, "Gita", "civil").await;
    let case_id = create_case(&app, &c, "Contract breach").await;
    let uri = format!("/api/v1/cases/{case_id}/assign");

    let (status, _) = put(&app, &uri, &first, json!({ "action": "accept" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = put(&app, &uri, &second, json!({ "action": "accept" })).await;
    assert!(
        status == StatusCode::FORBIDDEN || status == StatusCode::BAD_REQUEST,
        "unexpected {status}: {body}"
    );

    let (_, body) = get(&app, &format!("/api/v1/cases/{case_id}"), &c).await;
    assert_eq!(body["data"]["lawyer"], first.id.as_str());
}

#[tokio::test]
async fn concurrent_accepts_have_one_winner() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Hema").await;
    let a = lawyer(&app, "Imran", "civil").await;
    let b = lawyer(&app, "Jaya", "civil").await;
    let case_id = create_case(&app, &c, "Race").await;
    let uri = format!("/api/v1/cases/{case_id}/assign");

    let ((sa, _), (sb, _)) = tokio::join!(
        put(&app, &uri, &a, json!({ "action": "accept" })),
        put(&app, &uri, &b, json!({ "action": "accept" })),
    );
    let wins = [sa, sb].iter().filter(|s| **s == StatusCode::OK).count();
    assert_eq!(wins, 1);

    let (_, body) = get(&app, &format!("/api/v1/cases/{case_id}"), &c).await;
    let holder = body["data"]["lawyer"].as_str().unwrap();
    assert!(holder == a.id || holder == b.id);
}

#[tokio::test]
async fn rejected_case_clears_lawyer_and_leaves_lists() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Kavya").await;
    let l = lawyer(&app, "Lokesh", "civil").await;
    let (status, body) = post(
        &app,
        "/api/v1/cases",
        &c,
        json!({
            "title": "Inheritance",
            "description": "Will dispute",
            "caseType": "family",
            "lawyerId": l.id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let case_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = put(
        &app,
        &format!("/api/v1/cases/{case_id}/assign"),
        &l,
        json!({ "action": "reject" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["record"]["status"], "rejected");
    assert_eq!(body["data"]["record"]["lawyer"], Value::Null);

    let (_, mine) = get(&app, "/api/v1/lawyer/cases", &l).await;
    assert!(ids(&mine).is_empty());
}

#[tokio::test]
async fn requested_lawyer_gates_acceptance() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Mala").await;
    let wanted = lawyer(&app, "Nikhil", "civil").await;
    let other = lawyer(&app, "Omana", "civil").await;
    let (_, body) = post(
        &app,
        "/api/v1/cases",
        &c,
        json!({ "title": "Tenancy", "description": "Deposit", "caseType": "property", "lawyerId": wanted.id }),
    )
    .await;
    let case_id = body["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/cases/{case_id}/assign");

    let (status, body) = put(&app, &uri, &other, json!({ "action": "accept" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(kind(&body), "Forbidden");

    let (status, _) = put(&app, &uri, &wanted, json!({ "action": "accept" })).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn status_moves_forward_only_for_assigned_lawyer() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Prem").await;
    let l = lawyer(&app, "Qadir", "civil").await;
    let case_id = create_case(&app, &c, "Recovery").await;
    put(&app, &format!("/api/v1/cases/{case_id}/assign"), &l, json!({ "action": "accept" })).await;
    let uri = format!("/api/v1/cases/{case_id}/status");

    let (status, _) = patch(&app, &uri, &c, json!({ "status": "resolved" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = patch(&app, &uri, &l, json!({ "status": "closed" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "InvalidStateTransition");

    let (status, _) = patch(&app, &uri, &l, json!({ "status": "resolved" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = patch(&app, &uri, &l, json!({ "status": "closed" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "closed");

    let (status, _) = put(&app, &format!("/api/v1/cases/{case_id}"), &c, json!({ "title": "Renamed" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn citizens_only_see_their_own_cases() {
    let (app, _state) = test_app();
    let a = citizen(&app, "Rani").await;
    let b = citizen(&app, "Sanjay").await;
    let mine = create_case(&app, &a, "Mine").await;
    create_case(&app, &b, "Theirs").await;

    let (_, list) = get(&app, "/api/v1/cases", &a).await;
    assert_eq!(ids(&list), vec![mine.clone()]);

    let (status, body) = get(&app, &format!("/api/v1/cases/{mine}"), &b).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(kind(&body), "NotFound");
}

#[tokio::test]
async fn lawyers_cannot_file_cases() {
    let (app, _state) = test_app();
    let l = lawyer(&app, "Tanvi", "civil").await;
    let (status, _) = post(
        &app,
        "/api/v1/cases",
        &l,
        json!({ "title": "x", "description": "y", "caseType": "civil" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_case_id_is_bad_request() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Uma").await;
    let (status, body) = get(&app, "/api/v1/cases/not-a-uuid", &c).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid case UUID format");
}
