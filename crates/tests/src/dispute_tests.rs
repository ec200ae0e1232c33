use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{citizen, create_dispute, get, kind, lawyer, patch, post, test_app, TestUser};

async fn notification_count(app: &axum::Router, who: &TestUser) -> usize {
    let (status, body) = get(app, "/api/v1/disputes/notifications", who).await;
    assert_eq!(status, StatusCode::OK);
    body["data"].as_array().unwrap().len()
}

#[tokio::test]
async fn open_dispute_notifies_matching_lawyers_only() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Aarav").await;
    let family = [
        lawyer(&app, "Fam1", "family").await,
        lawyer(&app, "Fam2", "family").await,
        lawyer(&app, "Gen1", "other").await,
        lawyer(&app, "Fam3", "family").await,
    ];
    let criminal = lawyer(&app, "Crim1", "criminal").await;

    let created = create_dispute(&app, &c, "family").await;
    assert_eq!(created["dispute"]["assignmentStatus"], "unassigned");
    assert_eq!(created["dispute"]["status"], "draft");

    let suggested: Vec<&str> = created["suggestedLawyers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(suggested.len(), 3);
    assert!(!suggested.contains(&criminal.id.as_str()));

    let mut notified = 0;
    for l in &family {
        let count = notification_count(&app, l).await;
        assert!(count <= 1);
        assert_eq!(count == 1, suggested.contains(&l.id.as_str()));
        notified += count;
    }
    assert_eq!(notified, 3);
    assert_eq!(notification_count(&app, &criminal).await, 0);
}

#[tokio::test]
async fn concurrent_dispute_accepts_assign_one_lawyer() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Bhavna").await;
    let a = lawyer(&app, "Chetan", "contract").await;
    let b = lawyer(&app, "Deepa", "contract").await;
    let created = create_dispute(&app, &c, "contract").await;
    let uri = format!("/api/v1/disputes/{}/accept", created["dispute"]["id"].as_str().unwrap());

    let ((sa, _), (sb, _)) = tokio::join!(
        post(&app, &uri, &a, Value::Null),
        post(&app, &uri, &b, Value::Null),
    );
    assert_eq!([sa, sb].iter().filter(|s| **s == StatusCode::OK).count(), 1);

    let (_, body) = get(&app, &format!("/api/v1/disputes/{}", created["dispute"]["id"].as_str().unwrap()), &c).await;
    assert_eq!(body["data"]["assignmentStatus"], "accepted");
    let holder = body["data"]["assignedLawyer"].as_str().unwrap();
    assert!(holder == a.id || holder == b.id);
}

#[tokio::test]
async fn preferred_lawyer_can_decline_and_others_then_claim() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Farah").await;
    let wanted = lawyer(&app, "Ganesh", "property").await;
    let other = lawyer(&app, "Harini", "property").await;

    let (status, body) = post(
        &app,
        "/api/v1/disputes/create",
        &c,
        json!({
            "title": "Fence line",
            "description": "Neighbour moved the fence",
            "category": "property",
            "defendant": { "name": "Neighbour" },
            "preferredLawyer": wanted.id,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["dispute"]["status"], "pending");
    assert_eq!(body["data"]["dispute"]["assignmentStatus"], "pending-acceptance");
    let id = body["data"]["dispute"]["id"].as_str().unwrap().to_string();

    let (status, _) = post(&app, &format!("/api/v1/disputes/{id}/accept"), &other, Value::Null).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post(&app, &format!("/api/v1/disputes/{id}/decline"), &wanted, Value::Null).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, _) = post(&app, &format!("/api/v1/disputes/{id}/accept"), &other, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
}

/// File a dispute and have `l` accept it; returns the dispute id.
async fn accepted_dispute(app: &axum::Router, c: &TestUser, l: &TestUser, category: &str) -> String {
    let created = create_dispute(app, c, category).await;
    let id = created["dispute"]["id"].as_str().unwrap().to_string();
    let (status, body) = post(app, &format!("/api/v1/disputes/{id}/accept"), l, Value::Null).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    id
}

#[tokio::test]
async fn escalating_twice_yields_one_case() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Indu").await;
    let l = lawyer(&app, "Jatin", "employment").await;
    let id = accepted_dispute(&app, &c, &l, "employment").await;
    let uri = format!("/api/v1/disputes/{id}/create-case");

    let (status, first) = post(&app, &uri, &l, Value::Null).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["data"]["applied"], true);

    let (status, second) = post(&app, &uri, &l, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["data"]["applied"], false);
    assert_eq!(second["data"]["record"]["caseId"], first["data"]["record"]["caseId"]);

    let (_, cases) = get(&app, "/api/v1/citizen/cases", &c).await;
    let cases = cases["data"].as_array().unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0]["id"], first["data"]["record"]["caseId"]);
    assert_eq!(cases[0]["status"], "in progress");
    assert_eq!(cases[0]["lawyer"], l.id.as_str());
}

#[tokio::test]
async fn only_the_assigned_lawyer_escalates() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Kamal").await;
    let l = lawyer(&app, "Latha", "civil").await;
    let id = accepted_dispute(&app, &c, &l, "civil").await;

    let (status, _) = post(&app, &format!("/api/v1/disputes/{id}/create-case"), &c, Value::Null).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn escalation_response_hides_the_citizens_private_note() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Kiran").await;
    let l = lawyer(&app, "Lakshmi", "civil").await;
    let id = accepted_dispute(&app, &c, &l, "civil").await;
    let (status, _) = post(
        &app,
        &format!("/api/v1/disputes/{id}/messages"),
        &c,
        json!({ "content": "I can settle for half", "isPrivate": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/v1/disputes/{id}/create-case");
    for expected in [StatusCode::CREATED, StatusCode::OK] {
        let (status, body) = post(&app, &uri, &l, Value::Null).await;
        assert_eq!(status, expected);
        let messages = body["data"]["record"]["dispute"]["messages"].as_array().unwrap();
        assert!(!messages.is_empty());
        assert!(messages.iter().all(|m| m["content"] != "I can settle for half"));
    }
}

#[tokio::test]
async fn hearing_shows_on_the_dashboard_and_bad_filters_are_rejected() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Meena").await;
    let l = lawyer(&app, "Nikhil", "family").await;
    let id = accepted_dispute(&app, &c, &l, "family").await;

    let hearing = json!({
        "date": "2099-03-01T10:00:00Z",
        "location": "Family court, room 2",
        "hearingType": "mediation"
    });
    let (status, _) = post(&app, &format!("/api/v1/disputes/{id}/hearing"), &c, hearing.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = post(&app, &format!("/api/v1/disputes/{id}/hearing"), &l, hearing).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = get(&app, "/api/v1/disputes/dashboard", &c).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["summary"]["total"], 1);
    assert_eq!(body["data"]["summary"]["active"], 1);
    let hearings = body["data"]["upcomingHearings"].as_array().unwrap();
    assert_eq!(hearings.len(), 1);
    assert_eq!(hearings[0]["hearingLocation"], "Family court, room 2");

    let (status, body) = get(&app, "/api/v1/disputes?status=archived", &c).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "BadRequest");
    let (status, body) = get(&app, "/api/v1/disputes?status=active&assigned=mine", &l).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], id.as_str());
}

#[tokio::test]
async fn private_notes_stay_with_their_author() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Madhu").await;
    let l = lawyer(&app, "Naveen", "civil").await;
    let id = accepted_dispute(&app, &c, &l, "civil").await;
    let before = notification_count(&app, &c).await;

    let (status, _) = post(
        &app,
        &format!("/api/v1/disputes/{id}/messages"),
        &l,
        json!({ "content": "Weak evidence on their side", "isPrivate": true }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(notification_count(&app, &c).await, before);

    let (_, seen_by_citizen) = get(&app, &format!("/api/v1/disputes/{id}"), &c).await;
    let contents: Vec<&str> = seen_by_citizen["data"]["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert!(!contents.contains(&"Weak evidence on their side"));

    let (_, seen_by_lawyer) = get(&app, &format!("/api/v1/disputes/{id}"), &l).await;
    assert!(seen_by_lawyer["data"]["messages"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["content"] == "Weak evidence on their side"));
}

#[tokio::test]
async fn marking_read_twice_keeps_one_receipt() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Oviya").await;
    let l = lawyer(&app, "Pranav", "civil").await;
    let id = accepted_dispute(&app, &c, &l, "civil").await;
    post(
        &app,
        &format!("/api/v1/disputes/{id}/messages"),
        &l,
        json!({ "content": "Please send the invoice" }),
    )
    .await;

    let (_, view) = get(&app, &format!("/api/v1/disputes/{id}"), &c).await;
    assert!(view["data"]["unreadMessages"].as_u64().unwrap() >= 1);

    let uri = format!("/api/v1/disputes/{id}/messages/read");
    let (status, first) = post(&app, &uri, &c, Value::Null).await;
    assert_eq!(status, StatusCode::OK);
    assert!(first["data"]["marked"].as_u64().unwrap() >= 1);
    let (_, second) = post(&app, &uri, &c, Value::Null).await;
    assert_eq!(second["data"]["marked"], 0);

    let (_, view) = get(&app, &format!("/api/v1/disputes/{id}"), &c).await;
    assert_eq!(view["data"]["unreadMessages"], 0);
    for message in view["data"]["messages"].as_array().unwrap() {
        let mine = message["readBy"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|r| r["reader"]["id"] == c.id.as_str())
            .count();
        assert_eq!(mine, 1);
    }
}

#[tokio::test]
async fn creator_withdraws_but_cannot_drive_the_workflow() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Qamar").await;
    let l = lawyer(&app, "Rekha", "civil").await;
    let id = accepted_dispute(&app, &c, &l, "civil").await;
    let uri = format!("/api/v1/disputes/{id}/status");

    let (status, _) = patch(&app, &uri, &c, json!({ "status": "mediation" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = patch(&app, &uri, &l, json!({ "status": "mediation" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = patch(&app, &uri, &c, json!({ "status": "withdrawn" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "withdrawn");

    let (status, body) = patch(&app, &uri, &l, json!({ "status": "negotiation" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "InvalidStateTransition");
}

#[tokio::test]
async fn settlement_offer_is_answered_by_the_other_side() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Sita").await;
    let l = lawyer(&app, "Tarun", "civil").await;
    let id = accepted_dispute(&app, &c, &l, "civil").await;

    let (status, offer) = post(
        &app,
        &format!("/api/v1/disputes/{id}/settlements"),
        &l,
        json!({ "amount": 25000.0, "terms": "Paid in two instalments" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let offer_id = offer["data"]["id"].as_str().unwrap();
    let uri = format!("/api/v1/disputes/{id}/settlements/{offer_id}/respond");

    let (status, _) = post(&app, &uri, &l, json!({ "response": "accept" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = post(&app, &uri, &c, json!({ "response": "accept" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "accepted");

    let (status, _) = post(&app, &uri, &c, json!({ "response": "reject" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn strangers_cannot_see_a_dispute() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Usha").await;
    let stranger = citizen(&app, "Varun").await;
    let created = create_dispute(&app, &c, "civil").await;
    let id = created["dispute"]["id"].as_str().unwrap();

    let (status, _) = get(&app, &format!("/api/v1/disputes/{id}"), &stranger).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = get(&app, "/api/v1/disputes", &stranger).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}
