use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use server::{auth::JwtConfig, config::Settings, db::AppState, openapi::build_app};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret123";

/// Build the full application over a fresh in-memory store and blob store.
/// The returned state shares both backends with the router, so tests can
/// inspect or tamper with records directly.
pub fn test_app() -> (Router, AppState) {
    test_app_with(Settings::default())
}

pub fn test_app_with(settings: Settings) -> (Router, AppState) {
    let state = AppState::in_memory(JwtConfig::new(TEST_JWT_SECRET, 15), settings);
    (build_app(state.clone()), state)
}

/// A registered account and its bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub token: String,
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into()))
    };
    (status, value)
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(app, req).await
}

pub async fn get(app: &Router, uri: &str, user: &TestUser) -> (StatusCode, Value) {
    call(app, Method::GET, uri, Some(&user.token), None).await
}

pub async fn post(app: &Router, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(&user.token), Some(body)).await
}

pub async fn put(app: &Router, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
    call(app, Method::PUT, uri, Some(&user.token), Some(body)).await
}

pub async fn patch(app: &Router, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
    call(app, Method::PATCH, uri, Some(&user.token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, user: &TestUser) -> (StatusCode, Value) {
    call(app, Method::DELETE, uri, Some(&user.token), None).await
}

async fn login(app: &Router, email: &str, role: &str) -> TestUser {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD, "role": role })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    TestUser {
        id: body["data"]["user"]["id"].as_str().unwrap().to_string(),
        token: body["data"]["token"].as_str().unwrap().to_string(),
    }
}

/// Register a citizen named `name` and log them in.
pub async fn citizen(app: &Router, name: &str) -> TestUser {
    let email = format!("{}@citizens.test", name.to_lowercase());
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "role": "citizen",
            "name": name,
            "email": email,
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    login(app, &email, "citizen").await
}

/// Register a lawyer with the given specialization and log them in.
pub async fn lawyer(app: &Router, name: &str, specialization: &str) -> TestUser {
    let email = format!("{}@lawyers.test", name.to_lowercase());
    let (status, body) = call(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({
            "role": "lawyer",
            "name": name,
            "email": email,
            "password": PASSWORD,
            "specialization": specialization,
            "licenseNumber": format!("LIC-{name}"),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    login(app, &email, "lawyer").await
}

/// File a case as `owner` and return its id.
pub async fn create_case(app: &Router, owner: &TestUser, title: &str) -> String {
    let (status, body) = post(
        app,
        "/api/v1/cases",
        owner,
        json!({ "title": title, "description": "Details", "caseType": "civil" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create case failed: {body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

/// File a dispute as `owner` with no preferred lawyer and return the
/// creation payload.
pub async fn create_dispute(app: &Router, owner: &TestUser, category: &str) -> Value {
    let (status, body) = post(
        app,
        "/api/v1/disputes/create",
        owner,
        json!({
            "title": "Unpaid invoice",
            "description": "The contractor never paid",
            "category": category,
            "defendant": { "name": "Acme Builders" },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create dispute failed: {body}");
    body["data"].clone()
}

pub fn kind(body: &Value) -> &str {
    body["kind"].as_str().unwrap_or_default()
}
