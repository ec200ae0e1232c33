use axum::{extract::State, http::StatusCode, Json};
use shared_types::{ApiResponse, AppError, AuthResponse, LoginRequest, RegistrationRequest, UserProfile};

use crate::auth::JwtConfig;
use crate::identity;
use crate::repo::Store;

/// POST /api/v1/auth/register
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<UserProfile>),
        (status = 400, description = "Missing or invalid fields", body = AppError),
        (status = 409, description = "Email or license number already registered", body = AppError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(store): State<Store>,
    Json(body): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserProfile>>), AppError> {
    let profile = identity::register(&store, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Registration successful", profile)),
    ))
}

/// POST /api/v1/auth/login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Invalid credentials", body = AppError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(store): State<Store>,
    State(jwt): State<JwtConfig>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let auth = identity::login(&store, &jwt, body).await?;
    Ok(Json(ApiResponse::ok("Login successful", auth)))
}
