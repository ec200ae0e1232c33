use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use server::auth::JwtConfig;
use shared_types::{Citizen, Principal};
use uuid::Uuid;

use crate::common::{self, call, citizen, get, kind, lawyer, test_app, TestUser, TEST_JWT_SECRET};

#[tokio::test]
async fn register_returns_profile_without_token() {
    let (app, _state) = test_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "role": "citizen",
            "name": "Asha",
            "email": "asha@citizens.test",
            "password": common::PASSWORD,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "citizen");
    assert_eq!(body["data"]["email"], "asha@citizens.test");
    assert!(body["data"].get("token").is_none());
    assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let (app, _state) = test_app();
    citizen(&app, "Ravi").await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "role": "citizen",
            "name": "Ravi Again",
            "email": "ravi@citizens.test",
            "password": common::PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(kind(&body), "Conflict");
}

#[tokio::test]
async fn lawyer_registration_requires_license_and_specialization() {
    let (app, _state) = test_app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "role": "lawyer",
            "name": "Meera",
            "email": "meera@lawyers.test",
            "password": common::PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(kind(&body), "ValidationError");
    assert!(body["field_errors"].get("license_number").is_some());
}

#[tokio::test]
async fn wrong_password_does_not_reveal_account() {
    let (app, _state) = test_app();
    citizen(&app, "Kiran").await;

    for email in ["kiran@citizens.test", "nobody@citizens.test"] {
        let (status, body) = call(
            &app,
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "wrong-password", "role": "citizen" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn missing_token_is_unauthenticated() {
    let (app, _state) = test_app();
    let (status, body) = call(&app, Method::GET, "/api/v1/cases", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(kind(&body), "Unauthenticated");
}

#[tokio::test]
async fn garbage_token_is_invalid() {
    let (app, _state) = test_app();
    let (status, body) = call(&app, Method::GET, "/api/v1/cases", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(kind(&body), "InvalidToken");
}

#[tokio::test]
async fn expired_token_is_reported_as_expired() {
    let (app, _state) = test_app();
    let user = citizen(&app, "Dev").await;
    let id = Uuid::parse_str(&user.id).unwrap();

    let stale = JwtConfig::new(TEST_JWT_SECRET, -2)
        .create_access_token(&Principal::citizen(id))
        .unwrap();
    let (status, body) = call(&app, Method::GET, "/api/v1/citizen/profile", Some(&stale), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(kind(&body), "TokenExpired");
}

#[tokio::test]
async fn deleted_account_is_user_not_found() {
    let (app, state) = test_app();
    let user = citizen(&app, "Nila").await;
    let id = Uuid::parse_str(&user.id).unwrap();

    state.store.delete::<Citizen>(id).await.unwrap();

    let (status, body) = get(&app, "/api/v1/citizen/profile", &user).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(kind(&body), "UserNotFound");
}

#[tokio::test]
async fn role_claim_must_match_a_live_record() {
    let (app, state) = test_app();
    let user = citizen(&app, "Tara").await;
    let id = Uuid::parse_str(&user.id).unwrap();

    // Same id, forged lawyer role: no lawyer record exists under that id.
    let forged = TestUser {
        id: user.id.clone(),
        token: state.jwt.create_access_token(&Principal::lawyer(id)).unwrap(),
    };
    let (status, body) = get(&app, "/api/v1/lawyer/profile", &forged).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(kind(&body), "UserNotFound");
}

#[tokio::test]
async fn profiles_are_role_specific() {
    let (app, _state) = test_app();
    let c = citizen(&app, "Ira").await;
    let l = lawyer(&app, "Vikram", "civil").await;

    let (status, body) = get(&app, "/api/v1/citizen/profile", &c).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ira");

    let (status, _) = get(&app, "/api/v1/citizen/profile", &l).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get(&app, "/api/v1/lawyer/profile", &l).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["licenseNumber"], "LIC-Vikram");
    assert_eq!(body["data"]["assignedCaseCount"], 0);
}

#[tokio::test]
async fn health_is_public_and_carries_request_id() {
    let (app, _state) = test_app();
    let req = axum::http::Request::builder()
        .uri("/health")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
