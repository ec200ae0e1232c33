use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use server::{config::Settings, storage::Blobs};

use crate::common::{
    citizen, create_case, delete, get, kind, lawyer, patch, post, put, test_app, test_app_with, TestUser,
};

fn upload_body(file_name: &str, bytes: &[u8], case_id: Option<&str>) -> Value {
    json!({
        "title": "Tenancy agreement",
        "category": "contract",
        "fileName": file_name,
        "contentType": "application/pdf",
        "content": STANDARD.encode(bytes),
        "caseId": case_id,
    })
}

async fn upload(app: &axum::Router, owner: &TestUser, case_id: Option<&str>) -> Value {
    let (status, body) = post(app, "/api/v1/documents", owner, upload_body("lease.pdf", b"%PDF-1.7 lease", case_id)).await;
    assert_eq!(status, StatusCode::CREATED, "upload failed: {body}");
    body["data"].clone()
}

#[tokio::test]
async fn upload_stores_the_blob_and_records_metadata() {
    let (app, state) = test_app();
    let c = citizen(&app, "Anil").await;
    let doc = upload(&app, &c, None).await;

    assert_eq!(doc["status"], "pending");
    assert_eq!(doc["file"]["fileName"], "lease.pdf");
    assert_eq!(doc["file"]["fileSize"], 14);
    assert_eq!(doc["uploadedBy"], json!({ "kind": "citizen", "id": c.id }));
    let Blobs::Memory(blobs) = &state.blobs else {
        panic!("tests run on the memory blob store");
    };
    assert!(blobs.contains(doc["file"]["publicId"].as_str().unwrap()));

    let (status, link) = get(&app, &format!("/api/v1/documents/{}/download", doc["id"].as_str().unwrap()), &c).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(link["data"]["fileName"], "lease.pdf");
}

#[tokio::test]
async fn disallowed_extension_is_a_field_error() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Bina").await;
    let (status, body) = post(&app, "/api/v1/documents", &c, upload_body("payload.exe", b"MZ", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "ValidationError");
    assert!(body["field_errors"]["fileName"].is_string());
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let (app, _state) = test_app_with(Settings {
        upload_max_bytes: 16,
        ..Settings::default()
    });
    let c = citizen(&app, "Chitra").await;
    let (status, body) = post(&app, "/api/v1/documents", &c, upload_body("big.txt", &[b'x'; 17], None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "ValidationError");
    assert!(body["field_errors"]["content"].is_string());

    let (status, _) = post(&app, "/api/v1/documents", &c, upload_body("small.txt", &[b'x'; 16], None)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn delete_succeeds_even_when_the_blob_store_fails() {
    let (app, state) = test_app();
    let c = citizen(&app, "Dinesh").await;
    let doc = upload(&app, &c, None).await;
    let id = doc["id"].as_str().unwrap();
    if let Blobs::Memory(blobs) = &state.blobs {
        blobs.fail_deletes(true);
    }

    let (status, _) = delete(&app, &format!("/api/v1/documents/{id}"), &c).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &format!("/api/v1/documents/{id}"), &c).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sharing_grants_and_revokes_access() {
    let (app, _state) = test_app();
    let owner = citizen(&app, "Esha").await;
    let friend = citizen(&app, "Faisal").await;
    let doc = upload(&app, &owner, None).await;
    let id = doc["id"].as_str().unwrap();
    let uri = format!("/api/v1/documents/{id}");

    let (status, _) = get(&app, &uri, &friend).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &app,
        &format!("{uri}/share"),
        &owner,
        json!({ "principal": { "kind": "citizen", "id": friend.id }, "permission": "read" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, &uri, &friend).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(&app, &uri, &friend, json!({ "title": "Renamed" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, listed) = get(&app, "/api/v1/documents", &friend).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let (status, body) = delete(&app, &format!("{uri}/share/citizen/{}", friend.id), &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["shareSettings"]["sharedWith"], json!([]));

    let (status, _) = get(&app, &uri, &friend).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_uploader_shares() {
    let (app, _state) = test_app();
    let owner = citizen(&app, "Gita").await;
    let friend = citizen(&app, "Hari").await;
    let doc = upload(&app, &owner, None).await;
    let uri = format!("/api/v1/documents/{}", doc["id"].as_str().unwrap());
    post(
        &app,
        &format!("{uri}/share"),
        &owner,
        json!({ "principal": { "kind": "citizen", "id": friend.id }, "permission": "edit" }),
    )
    .await;

    let (status, _) = put(&app, &uri, &friend, json!({ "title": "Signed copy" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post(&app, &format!("{uri}/share"), &friend, json!({ "isPublic": true })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = delete(&app, &uri, &friend).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn revoke_rejects_unknown_principal_kind() {
    let (app, _state) = test_app();
    let owner = citizen(&app, "Isha").await;
    let doc = upload(&app, &owner, None).await;
    let (status, body) = delete(
        &app,
        &format!("/api/v1/documents/{}/share/judge/{}", doc["id"].as_str().unwrap(), owner.id),
        &owner,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "BadRequest");
}

#[tokio::test]
async fn case_lawyer_reviews_linked_documents_once() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Jaya").await;
    let l = lawyer(&app, "Kiran", "civil").await;
    let outsider = lawyer(&app, "Lalit", "civil").await;
    let case_id = create_case(&app, &c, "Boundary wall").await;
    let (status, _) = put(&app, &format!("/api/v1/cases/{case_id}/assign"), &l, json!({ "action": "accept" })).await;
    assert_eq!(status, StatusCode::OK);

    let doc = upload(&app, &c, Some(&case_id)).await;
    let uri = format!("/api/v1/documents/{}", doc["id"].as_str().unwrap());

    let (status, _) = get(&app, &uri, &l).await;
    assert_eq!(status, StatusCode::OK);
    let (_, clients) = get(&app, "/api/v1/documents/clients/all", &l).await;
    assert_eq!(clients["data"].as_array().unwrap().len(), 1);

    let (status, _) = patch(&app, &format!("{uri}/status"), &outsider, json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = patch(&app, &format!("{uri}/status"), &l, json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "approved");

    let (status, body) = patch(&app, &format!("{uri}/status"), &l, json!({ "status": "rejected" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "InvalidStateTransition");

    let (status, _) = patch(&app, &format!("{uri}/status"), &c, json!({ "status": "approved" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
