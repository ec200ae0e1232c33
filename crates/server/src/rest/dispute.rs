use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use shared_types::{
    AddDeadlineRequest, ApiResponse, AppError, CreateDisputeRequest, DisputeCreated, DisputeDashboard,
    DisputeDeadline, DisputeListQuery, DisputeMessage, DisputeView, EscalationResult, NotificationEntry,
    PostMessageRequest, ProposeSettlementRequest, RespondSettlementRequest, ScheduleHearingRequest,
    SettlementOffer, Transition, UpdateDisputeStatusRequest,
};

use super::parse_id;
use crate::auth::CurrentUser;
use crate::config::Settings;
use crate::lifecycle::dispute as disputes;
use crate::repo::Store;

/// Count of entries whose read state changed.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct MarkedRead {
    pub marked: usize,
}

/// POST /api/v1/disputes/create
#[utoipa::path(
    post,
    path = "/api/v1/disputes/create",
    request_body = CreateDisputeRequest,
    responses(
        (status = 201, description = "Dispute filed", body = ApiResponse<DisputeCreated>),
        (status = 400, description = "Invalid request", body = AppError),
        (status = 404, description = "Preferred lawyer or defendant not found", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn create_dispute(
    State(store): State<Store>,
    State(settings): State<Settings>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<CreateDisputeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DisputeCreated>>), AppError> {
    let created = disputes::create(&store, &who, body, settings.candidate_limit).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Dispute created successfully", created)),
    ))
}

/// GET /api/v1/disputes
#[utoipa::path(
    get,
    path = "/api/v1/disputes",
    params(DisputeListQuery),
    responses(
        (status = 200, description = "Disputes in the caller's scope", body = ApiResponse<Vec<DisputeView>>),
        (status = 400, description = "Unknown status filter", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn list_disputes(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Query(query): Query<DisputeListQuery>,
) -> Result<Json<ApiResponse<Vec<DisputeView>>>, AppError> {
    let found = disputes::list(&store, &who, &query).await?;
    Ok(Json(ApiResponse::ok("Disputes retrieved", found)))
}

/// GET /api/v1/disputes/dashboard
#[utoipa::path(
    get,
    path = "/api/v1/disputes/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DisputeDashboard>)
    ),
    tag = "disputes"
)]
pub async fn get_dashboard(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<DisputeDashboard>>, AppError> {
    let dashboard = disputes::dashboard(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Dashboard retrieved", dashboard)))
}

/// GET /api/v1/disputes/notifications
#[utoipa::path(
    get,
    path = "/api/v1/disputes/notifications",
    responses(
        (status = 200, description = "Notifications addressed to the caller", body = ApiResponse<Vec<NotificationEntry>>)
    ),
    tag = "disputes"
)]
pub async fn list_notifications(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<Vec<NotificationEntry>>>, AppError> {
    let entries = disputes::notifications(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Notifications retrieved", entries)))
}

/// GET /api/v1/disputes/{id}
#[utoipa::path(
    get,
    path = "/api/v1/disputes/{id}",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Dispute as seen by the caller", body = ApiResponse<DisputeView>),
        (status = 404, description = "Dispute not found", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn get_dispute(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DisputeView>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let dispute = disputes::get(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok(
        "Dispute retrieved",
        disputes::view(dispute, &who, Utc::now()),
    )))
}

/// POST /api/v1/disputes/{id}/accept
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/accept",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Dispute accepted; `applied` is false for a replay", body = ApiResponse<Transition<DisputeView>>),
        (status = 400, description = "Dispute is no longer open", body = AppError),
        (status = 403, description = "Not eligible to accept", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn accept_dispute(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Transition<DisputeView>>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let now = Utc::now();
    let outcome = disputes::accept(&store, &who, id)
        .await?
        .map(|d| disputes::view(d, &who, now));
    Ok(Json(ApiResponse::ok("Dispute assignment accepted successfully", outcome)))
}

/// POST /api/v1/disputes/{id}/decline
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/decline",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Dispute declined and reopened", body = ApiResponse<DisputeView>),
        (status = 400, description = "Dispute is not awaiting this lawyer", body = AppError),
        (status = 403, description = "Not the requested lawyer", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn decline_dispute(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DisputeView>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let dispute = disputes::decline(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok(
        "Dispute declined",
        disputes::view(dispute, &who, Utc::now()),
    )))
}

/// POST /api/v1/disputes/{id}/messages
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/messages",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = PostMessageRequest,
    responses(
        (status = 201, description = "Message appended", body = ApiResponse<DisputeMessage>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn post_message(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DisputeMessage>>), AppError> {
    let id = parse_id(&id, "dispute")?;
    let message = disputes::post_message(&store, &who, id, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Message sent", message))))
}

/// POST /api/v1/disputes/{id}/messages/read
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/messages/read",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Messages marked read", body = ApiResponse<MarkedRead>)
    ),
    tag = "disputes"
)]
pub async fn mark_messages_read(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MarkedRead>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let marked = disputes::mark_messages_read(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Messages marked as read", MarkedRead { marked })))
}

/// POST /api/v1/disputes/{id}/notifications/read
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/notifications/read",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 200, description = "Notifications marked read", body = ApiResponse<MarkedRead>)
    ),
    tag = "disputes"
)]
pub async fn mark_notifications_read(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MarkedRead>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let marked = disputes::mark_notifications_read(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Notifications marked as read", MarkedRead { marked })))
}

/// PATCH /api/v1/disputes/{id}/status
#[utoipa::path(
    patch,
    path = "/api/v1/disputes/{id}/status",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = UpdateDisputeStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<DisputeView>),
        (status = 400, description = "Transition not allowed", body = AppError),
        (status = 403, description = "Not allowed to change the status", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn update_dispute_status(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateDisputeStatusRequest>,
) -> Result<Json<ApiResponse<DisputeView>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let dispute = disputes::update_status(&store, &who, id, body.status).await?;
    Ok(Json(ApiResponse::ok(
        "Dispute status updated",
        disputes::view(dispute, &who, Utc::now()),
    )))
}

/// POST /api/v1/disputes/{id}/hearing
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/hearing",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = ScheduleHearingRequest,
    responses(
        (status = 200, description = "Hearing scheduled", body = ApiResponse<DisputeView>),
        (status = 403, description = "Not the assigned lawyer", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn schedule_hearing(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ScheduleHearingRequest>,
) -> Result<Json<ApiResponse<DisputeView>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let dispute = disputes::schedule_hearing(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok(
        "Hearing scheduled successfully",
        disputes::view(dispute, &who, Utc::now()),
    )))
}

/// POST /api/v1/disputes/{id}/settlements
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/settlements",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = ProposeSettlementRequest,
    responses(
        (status = 201, description = "Offer recorded", body = ApiResponse<SettlementOffer>),
        (status = 403, description = "Not a participant", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn propose_settlement(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ProposeSettlementRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SettlementOffer>>), AppError> {
    let id = parse_id(&id, "dispute")?;
    let offer = disputes::propose_settlement(&store, &who, id, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Settlement offer proposed", offer))))
}

/// POST /api/v1/disputes/{id}/settlements/{offer_id}/respond
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/settlements/{offer_id}/respond",
    params(
        ("id" = String, Path, description = "Dispute UUID"),
        ("offer_id" = String, Path, description = "Settlement offer UUID")
    ),
    request_body = RespondSettlementRequest,
    responses(
        (status = 200, description = "Offer answered", body = ApiResponse<SettlementOffer>),
        (status = 400, description = "Offer is no longer pending", body = AppError),
        (status = 403, description = "Not this party's offer to answer", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn respond_settlement(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path((id, offer_id)): Path<(String, String)>,
    Json(body): Json<RespondSettlementRequest>,
) -> Result<Json<ApiResponse<SettlementOffer>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let offer_id = parse_id(&offer_id, "offer")?;
    let offer = disputes::respond_settlement(&store, &who, id, offer_id, body.response).await?;
    Ok(Json(ApiResponse::ok("Settlement offer updated", offer)))
}

/// POST /api/v1/disputes/{id}/deadlines
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/deadlines",
    params(("id" = String, Path, description = "Dispute UUID")),
    request_body = AddDeadlineRequest,
    responses(
        (status = 201, description = "Deadline added", body = ApiResponse<DisputeDeadline>),
        (status = 403, description = "Not the assigned lawyer", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn add_deadline(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<AddDeadlineRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DisputeDeadline>>), AppError> {
    let id = parse_id(&id, "dispute")?;
    let deadline = disputes::add_deadline(&store, &who, id, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok("Deadline added", deadline))))
}

/// POST /api/v1/disputes/{id}/deadlines/{deadline_id}/complete
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/deadlines/{deadline_id}/complete",
    params(
        ("id" = String, Path, description = "Dispute UUID"),
        ("deadline_id" = String, Path, description = "Deadline UUID")
    ),
    responses(
        (status = 200, description = "Deadline completed", body = ApiResponse<DisputeDeadline>),
        (status = 404, description = "Deadline not found", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn complete_deadline(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path((id, deadline_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<DisputeDeadline>>, AppError> {
    let id = parse_id(&id, "dispute")?;
    let deadline_id = parse_id(&deadline_id, "deadline")?;
    let deadline = disputes::complete_deadline(&store, &who, id, deadline_id).await?;
    Ok(Json(ApiResponse::ok("Deadline completed", deadline)))
}

/// POST /api/v1/disputes/{id}/create-case
#[utoipa::path(
    post,
    path = "/api/v1/disputes/{id}/create-case",
    params(("id" = String, Path, description = "Dispute UUID")),
    responses(
        (status = 201, description = "Case opened from the dispute", body = ApiResponse<Transition<EscalationResult>>),
        (status = 200, description = "Case already opened; the existing id is returned", body = ApiResponse<Transition<EscalationResult>>),
        (status = 400, description = "Dispute cannot be escalated", body = AppError),
        (status = 403, description = "Not the assigned lawyer", body = AppError)
    ),
    tag = "disputes"
)]
pub async fn escalate_dispute(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<Transition<EscalationResult>>>), AppError> {
    let id = parse_id(&id, "dispute")?;
    let outcome = disputes::escalate(&store, &who, id).await?;
    let status = if outcome.applied { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(ApiResponse::ok("Case created from dispute successfully", outcome))))
}
