use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    ApiResponse, AppError, CreateReportRequest, Report, ReportListQuery, ShareReportRequest, UpdateReportRequest,
};

use super::parse_id;
use crate::auth::CurrentUser;
use crate::lifecycle::report as reports;
use crate::repo::Store;

/// POST /api/v1/reports
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Draft report created", body = ApiResponse<Report>),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 404, description = "Linked case not found", body = AppError)
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Report>>), AppError> {
    let report = reports::create(&store, &who, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Report created successfully", report))))
}

/// GET /api/v1/reports
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Reports readable by the caller", body = ApiResponse<Vec<Report>>)
    ),
    tag = "reports"
)]
pub async fn list_reports(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<Report>>>, AppError> {
    let found = reports::list(&store, &who, &query).await?;
    Ok(Json(ApiResponse::ok("Reports retrieved", found)))
}

/// GET /api/v1/reports/shared/all
#[utoipa::path(
    get,
    path = "/api/v1/reports/shared/all",
    responses(
        (status = 200, description = "Reports others made visible to the citizen", body = ApiResponse<Vec<Report>>),
        (status = 403, description = "Caller is not a citizen", body = AppError)
    ),
    tag = "reports"
)]
pub async fn list_shared_reports(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Report>>>, AppError> {
    let found = reports::shared_for_citizen(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Shared reports retrieved", found)))
}

/// GET /api/v1/reports/{id}
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<Report>),
        (status = 403, description = "Not authorized to view", body = AppError),
        (status = 404, description = "Report not found", body = AppError)
    ),
    tag = "reports"
)]
pub async fn get_report(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let id = parse_id(&id, "report")?;
    let report = reports::get(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Report retrieved", report)))
}

/// PUT /api/v1/reports/{id}
#[utoipa::path(
    put,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report UUID")),
    request_body = UpdateReportRequest,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<Report>),
        (status = 403, description = "Not the owner or an editor", body = AppError)
    ),
    tag = "reports"
)]
pub async fn update_report(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateReportRequest>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let id = parse_id(&id, "report")?;
    let report = reports::update(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Report updated successfully", report)))
}

/// DELETE /api/v1/reports/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/reports/{id}",
    params(("id" = String, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Report deleted", body = ApiResponse<String>),
        (status = 403, description = "Only the owner can delete", body = AppError)
    ),
    tag = "reports"
)]
pub async fn delete_report(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id, "report")?;
    reports::delete(&store, &who, id).await?;
    Ok(Json(ApiResponse::message("Report deleted successfully")))
}

/// POST /api/v1/reports/{id}/share
#[utoipa::path(
    post,
    path = "/api/v1/reports/{id}/share",
    params(("id" = String, Path, description = "Report UUID")),
    request_body = ShareReportRequest,
    responses(
        (status = 200, description = "Grant recorded", body = ApiResponse<Report>),
        (status = 403, description = "Only the owner can share", body = AppError),
        (status = 404, description = "Grantee not found", body = AppError)
    ),
    tag = "reports"
)]
pub async fn share_report(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ShareReportRequest>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let id = parse_id(&id, "report")?;
    let report = reports::share(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Report shared successfully", report)))
}

/// PATCH /api/v1/reports/{id}/finalize
#[utoipa::path(
    patch,
    path = "/api/v1/reports/{id}/finalize",
    params(("id" = String, Path, description = "Report UUID")),
    responses(
        (status = 200, description = "Report is now final", body = ApiResponse<Report>),
        (status = 400, description = "Report already final", body = AppError),
        (status = 403, description = "Only the owner can finalize", body = AppError)
    ),
    tag = "reports"
)]
pub async fn finalize_report(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Report>>, AppError> {
    let id = parse_id(&id, "report")?;
    let report = reports::finalize(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Report finalized successfully", report)))
}
