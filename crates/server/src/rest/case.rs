use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    ApiResponse, AppError, AssignAction, AssignCaseRequest, Case, CaseListQuery, CreateCaseRequest,
    Transition, UpdateCaseRequest, UpdateCaseStatusRequest,
};

use super::parse_id;
use crate::auth::CurrentUser;
use crate::lifecycle::case as cases;
use crate::repo::Store;

/// POST /api/v1/cases
#[utoipa::path(
    post,
    path = "/api/v1/cases",
    request_body = CreateCaseRequest,
    responses(
        (status = 201, description = "Case created", body = ApiResponse<Case>),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 403, description = "Only citizens can create cases", body = AppError),
        (status = 404, description = "Requested lawyer not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn create_case(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Case>>), AppError> {
    let case = cases::create(&store, &who, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Case created successfully", case))))
}

/// GET /api/v1/cases
#[utoipa::path(
    get,
    path = "/api/v1/cases",
    params(CaseListQuery),
    responses(
        (status = 200, description = "Cases in the caller's scope", body = ApiResponse<Vec<Case>>)
    ),
    tag = "cases"
)]
pub async fn list_cases(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Query(query): Query<CaseListQuery>,
) -> Result<Json<ApiResponse<Vec<Case>>>, AppError> {
    let found = cases::list(&store, &who, &query).await?;
    Ok(Json(ApiResponse::ok("Cases retrieved", found)))
}

/// GET /api/v1/citizen/cases
#[utoipa::path(
    get,
    path = "/api/v1/citizen/cases",
    responses(
        (status = 200, description = "The citizen's own cases", body = ApiResponse<Vec<Case>>),
        (status = 403, description = "Caller is not a citizen", body = AppError)
    ),
    tag = "cases"
)]
pub async fn list_citizen_cases(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Case>>>, AppError> {
    let found = cases::citizen_cases(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Cases retrieved", found)))
}

/// GET /api/v1/lawyer/cases
#[utoipa::path(
    get,
    path = "/api/v1/lawyer/cases",
    responses(
        (status = 200, description = "Cases assigned to the lawyer", body = ApiResponse<Vec<Case>>),
        (status = 403, description = "Caller is not a lawyer", body = AppError)
    ),
    tag = "cases"
)]
pub async fn list_lawyer_cases(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Case>>>, AppError> {
    let found = cases::lawyer_cases(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Cases retrieved", found)))
}

/// GET /api/v1/cases/{id}
#[utoipa::path(
    get,
    path = "/api/v1/cases/{id}",
    params(("id" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Case found", body = ApiResponse<Case>),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn get_case(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Case>>, AppError> {
    let id = parse_id(&id, "case")?;
    let case = cases::get(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Case retrieved", case)))
}

/// PUT /api/v1/cases/{id}
#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}",
    params(("id" = String, Path, description = "Case UUID")),
    request_body = UpdateCaseRequest,
    responses(
        (status = 200, description = "Case updated", body = ApiResponse<Case>),
        (status = 400, description = "Case is closed or rejected", body = AppError),
        (status = 403, description = "Not a participant", body = AppError),
        (status = 404, description = "Case not found", body = AppError)
    ),
    tag = "cases"
)]
pub async fn update_case(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateCaseRequest>,
) -> Result<Json<ApiResponse<Case>>, AppError> {
    let id = parse_id(&id, "case")?;
    let case = cases::update(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Case updated successfully", case)))
}

/// PUT /api/v1/cases/{id}/assign
#[utoipa::path(
    put,
    path = "/api/v1/cases/{id}/assign",
    params(("id" = String, Path, description = "Case UUID")),
    request_body = AssignCaseRequest,
    responses(
        (status = 200, description = "Assignment decided; `applied` is false for a replay", body = ApiResponse<Transition<Case>>),
        (status = 400, description = "Case is no longer pending", body = AppError),
        (status = 403, description = "Not eligible to take this case", body = AppError),
        (status = 409, description = "Repeated write conflicts", body = AppError)
    ),
    tag = "cases"
)]
pub async fn assign_case(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<AssignCaseRequest>,
) -> Result<Json<ApiResponse<Transition<Case>>>, AppError> {
    let id = parse_id(&id, "case")?;
    let outcome = cases::assign(&store, &who, id, body.action).await?;
    let message = match body.action {
        AssignAction::Accept => "Case accepted successfully",
        AssignAction::Reject => "Case rejected successfully",
    };
    Ok(Json(ApiResponse::ok(message, outcome)))
}

/// PATCH /api/v1/cases/{id}/status
#[utoipa::path(
    patch,
    path = "/api/v1/cases/{id}/status",
    params(("id" = String, Path, description = "Case UUID")),
    request_body = UpdateCaseStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = ApiResponse<Case>),
        (status = 400, description = "Transition not allowed", body = AppError),
        (status = 403, description = "Not the assigned lawyer", body = AppError)
    ),
    tag = "cases"
)]
pub async fn update_case_status(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateCaseStatusRequest>,
) -> Result<Json<ApiResponse<Case>>, AppError> {
    let id = parse_id(&id, "case")?;
    let case = cases::progress(&store, &who, id, body.status).await?;
    Ok(Json(ApiResponse::ok("Case status updated", case)))
}
