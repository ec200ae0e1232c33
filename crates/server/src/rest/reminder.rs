use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    ApiResponse, AppError, CreateReminderRequest, Reminder, ReminderListQuery, UpdateReminderRequest,
};

use super::parse_id;
use crate::auth::CurrentUser;
use crate::lifecycle::reminder as reminders;
use crate::repo::Store;

/// POST /api/v1/reminders
#[utoipa::path(
    post,
    path = "/api/v1/reminders",
    request_body = CreateReminderRequest,
    responses(
        (status = 201, description = "Reminder created", body = ApiResponse<Reminder>),
        (status = 400, description = "Invalid request", body = AppError)
    ),
    tag = "reminders"
)]
pub async fn create_reminder(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Reminder>>), AppError> {
    let reminder = reminders::create(&store, &who, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Reminder created", reminder))))
}

/// GET /api/v1/reminders
#[utoipa::path(
    get,
    path = "/api/v1/reminders",
    params(ReminderListQuery),
    responses(
        (status = 200, description = "Caller's reminders, soonest first", body = ApiResponse<Vec<Reminder>>)
    ),
    tag = "reminders"
)]
pub async fn list_reminders(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Query(query): Query<ReminderListQuery>,
) -> Result<Json<ApiResponse<Vec<Reminder>>>, AppError> {
    let found = reminders::list(&store, &who, &query).await?;
    Ok(Json(ApiResponse::ok("Reminders retrieved", found)))
}

/// GET /api/v1/reminders/{id}
#[utoipa::path(
    get,
    path = "/api/v1/reminders/{id}",
    params(("id" = String, Path, description = "Reminder UUID")),
    responses(
        (status = 200, description = "Reminder found", body = ApiResponse<Reminder>),
        (status = 404, description = "Reminder not found", body = AppError)
    ),
    tag = "reminders"
)]
pub async fn get_reminder(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let reminder = reminders::get(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Reminder retrieved", reminder)))
}

/// PUT /api/v1/reminders/{id}
#[utoipa::path(
    put,
    path = "/api/v1/reminders/{id}",
    params(("id" = String, Path, description = "Reminder UUID")),
    request_body = UpdateReminderRequest,
    responses(
        (status = 200, description = "Reminder updated", body = ApiResponse<Reminder>),
        (status = 404, description = "Reminder not found", body = AppError)
    ),
    tag = "reminders"
)]
pub async fn update_reminder(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateReminderRequest>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let reminder = reminders::update(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Reminder updated", reminder)))
}

/// DELETE /api/v1/reminders/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/reminders/{id}",
    params(("id" = String, Path, description = "Reminder UUID")),
    responses(
        (status = 200, description = "Reminder deleted", body = ApiResponse<String>),
        (status = 404, description = "Reminder not found", body = AppError)
    ),
    tag = "reminders"
)]
pub async fn delete_reminder(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id, "reminder")?;
    reminders::delete(&store, &who, id).await?;
    Ok(Json(ApiResponse::message("Reminder deleted")))
}

/// PATCH /api/v1/reminders/{id}/toggle
#[utoipa::path(
    patch,
    path = "/api/v1/reminders/{id}/toggle",
    params(("id" = String, Path, description = "Reminder UUID")),
    responses(
        (status = 200, description = "Completion flipped", body = ApiResponse<Reminder>),
        (status = 404, description = "Reminder not found", body = AppError)
    ),
    tag = "reminders"
)]
pub async fn toggle_reminder(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Reminder>>, AppError> {
    let id = parse_id(&id, "reminder")?;
    let reminder = reminders::toggle(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Reminder status updated", reminder)))
}
