use axum::{extract::State, Json};
use shared_types::{ApiResponse, AppError, LawyerSummary, Principal, Role, UpdateProfileRequest, UserProfile};

use crate::auth::CurrentUser;
use crate::identity;
use crate::repo::Store;

fn require_role(who: &Principal, role: Role) -> Result<(), AppError> {
    if who.role == role {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("This endpoint is for {role} accounts")))
    }
}

/// GET /api/v1/citizen/profile
#[utoipa::path(
    get,
    path = "/api/v1/citizen/profile",
    responses(
        (status = 200, description = "Citizen profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "Caller is not a citizen", body = AppError)
    ),
    tag = "profiles"
)]
pub async fn get_citizen_profile(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    require_role(&who, Role::Citizen)?;
    let profile = identity::profile(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Profile retrieved", profile)))
}

/// PUT /api/v1/citizen/profile
#[utoipa::path(
    put,
    path = "/api/v1/citizen/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid update", body = AppError)
    ),
    tag = "profiles"
)]
pub async fn update_citizen_profile(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    require_role(&who, Role::Citizen)?;
    let profile = identity::update_profile(&store, &who, body).await?;
    Ok(Json(ApiResponse::ok("Profile updated", profile)))
}

/// GET /api/v1/lawyer/profile
#[utoipa::path(
    get,
    path = "/api/v1/lawyer/profile",
    responses(
        (status = 200, description = "Lawyer profile with assigned case count", body = ApiResponse<UserProfile>),
        (status = 403, description = "Caller is not a lawyer", body = AppError)
    ),
    tag = "profiles"
)]
pub async fn get_lawyer_profile(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    require_role(&who, Role::Lawyer)?;
    let profile = identity::profile(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Profile retrieved", profile)))
}

/// PUT /api/v1/lawyer/profile
#[utoipa::path(
    put,
    path = "/api/v1/lawyer/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfile>),
        (status = 400, description = "Invalid update", body = AppError)
    ),
    tag = "profiles"
)]
pub async fn update_lawyer_profile(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    require_role(&who, Role::Lawyer)?;
    let profile = identity::update_profile(&store, &who, body).await?;
    Ok(Json(ApiResponse::ok("Profile updated", profile)))
}

/// GET /api/v1/lawyers
#[utoipa::path(
    get,
    path = "/api/v1/lawyers",
    responses(
        (status = 200, description = "Lawyer directory", body = ApiResponse<Vec<LawyerSummary>>)
    ),
    tag = "profiles"
)]
pub async fn list_lawyers(
    State(store): State<Store>,
    CurrentUser(_who): CurrentUser,
) -> Result<Json<ApiResponse<Vec<LawyerSummary>>>, AppError> {
    let lawyers = identity::lawyer_directory(&store).await?;
    Ok(Json(ApiResponse::ok("Lawyers retrieved", lawyers)))
}
