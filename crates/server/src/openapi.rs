use axum::{extract::DefaultBodyLimit, middleware, Router};
use shared_types::{
    // Errors and envelopes
    AppError, AppErrorKind,
    // Principals and sharing
    ActorRef, Role, SharePermission, ShareGrant,
    // Accounts
    AuthResponse, CitizenRegistration, LawyerRegistration, LawyerSummary, LoginRequest,
    RegistrationRequest, Specialization, UpdateProfileRequest, UserProfile,
    // Cases
    AssignAction, AssignCaseRequest, Case, CaseStatus, CaseType, CreateCaseRequest,
    UpdateCaseRequest, UpdateCaseStatusRequest,
    // Disputes
    AddDeadlineRequest, AssignedFilter, AssignmentStatus, CreateDisputeRequest, DashboardSummary,
    Dispute, DisputeCategory, DisputeCreated, DisputeDashboard, DisputeDeadline, DisputeMessage,
    DisputePriority, DisputeStatus, DisputeView, EscalationResult, HearingType, MessageType,
    Notification, NotificationEntry, NotificationType, OfferResponse, OfferStatus, Parties, Party,
    PartyInput, PartyKind, PostMessageRequest, ProposeSettlementRequest, ReadReceipt,
    RespondSettlementRequest, ScheduleHearingRequest, SettlementOffer, TimelineFilter,
    UpdateDisputeStatusRequest,
    // Documents
    Document, DocumentCategory, DocumentStatus, DownloadLink, FileMeta, ReviewDocumentRequest,
    ShareDocumentRequest, ShareSettings, UpdateDocumentRequest, UploadDocumentRequest,
    // Reminders
    CreateReminderRequest, Reminder, ReminderPriority, UpdateReminderRequest,
    // Reports
    CreateReportRequest, Report, ReportStatus, ReportType, ShareReportRequest, UpdateReportRequest,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::auth::middleware::auth_middleware;
use crate::db::AppState;
use crate::health::{self, HealthResponse};
use crate::rest::{self, dispute::MarkedRead};
use crate::telemetry::OtelTraceLayer;

/// OpenAPI documentation for the API.
#[derive(OpenApi)]
#[openapi(
    paths(
        // Accounts
        rest::auth::register,
        rest::auth::login,
        rest::profile::get_citizen_profile,
        rest::profile::update_citizen_profile,
        rest::profile::get_lawyer_profile,
        rest::profile::update_lawyer_profile,
        rest::profile::list_lawyers,
        // Cases
        rest::case::create_case,
        rest::case::list_cases,
        rest::case::list_citizen_cases,
        rest::case::list_lawyer_cases,
        rest::case::get_case,
        rest::case::update_case,
        rest::case::assign_case,
        rest::case::update_case_status,
        // Disputes
        rest::dispute::create_dispute,
        rest::dispute::list_disputes,
        rest::dispute::get_dashboard,
        rest::dispute::list_notifications,
        rest::dispute::get_dispute,
        rest::dispute::accept_dispute,
        rest::dispute::decline_dispute,
        rest::dispute::post_message,
        rest::dispute::mark_messages_read,
        rest::dispute::mark_notifications_read,
        rest::dispute::update_dispute_status,
        rest::dispute::schedule_hearing,
        rest::dispute::propose_settlement,
        rest::dispute::respond_settlement,
        rest::dispute::add_deadline,
        rest::dispute::complete_deadline,
        rest::dispute::escalate_dispute,
        // Documents
        rest::document::upload_document,
        rest::document::list_documents,
        rest::document::list_client_documents,
        rest::document::get_document,
        rest::document::update_document,
        rest::document::review_document,
        rest::document::delete_document,
        rest::document::share_document,
        rest::document::revoke_share,
        rest::document::download_document,
        // Reminders
        rest::reminder::create_reminder,
        rest::reminder::list_reminders,
        rest::reminder::get_reminder,
        rest::reminder::update_reminder,
        rest::reminder::delete_reminder,
        rest::reminder::toggle_reminder,
        // Reports
        rest::report::create_report,
        rest::report::list_reports,
        rest::report::list_shared_reports,
        rest::report::get_report,
        rest::report::update_report,
        rest::report::delete_report,
        rest::report::share_report,
        rest::report::finalize_report,
        // Health
        health::health_check,
    ),
    components(schemas(
        AppError, AppErrorKind,
        ActorRef, Role, SharePermission, ShareGrant,
        AuthResponse, CitizenRegistration, LawyerRegistration, LawyerSummary, LoginRequest,
        RegistrationRequest, Specialization, UpdateProfileRequest, UserProfile,
        AssignAction, AssignCaseRequest, Case, CaseStatus, CaseType, CreateCaseRequest,
        UpdateCaseRequest, UpdateCaseStatusRequest,
        AddDeadlineRequest, AssignedFilter, AssignmentStatus, CreateDisputeRequest, DashboardSummary,
        Dispute, DisputeCategory, DisputeCreated, DisputeDashboard, DisputeDeadline, DisputeMessage,
        DisputePriority, DisputeStatus, DisputeView, EscalationResult, HearingType, MessageType,
        Notification, NotificationEntry, NotificationType, OfferResponse, OfferStatus, Parties, Party,
        PartyInput, PartyKind, PostMessageRequest, ProposeSettlementRequest, ReadReceipt,
        RespondSettlementRequest, ScheduleHearingRequest, SettlementOffer, TimelineFilter,
        UpdateDisputeStatusRequest, MarkedRead,
        Document, DocumentCategory, DocumentStatus, DownloadLink, FileMeta, ReviewDocumentRequest,
        ShareDocumentRequest, ShareSettings, UpdateDocumentRequest, UploadDocumentRequest,
        CreateReminderRequest, Reminder, ReminderPriority, UpdateReminderRequest,
        CreateReportRequest, Report, ReportStatus, ReportType, ShareReportRequest, UpdateReportRequest,
        HealthResponse,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "profiles", description = "Citizen and lawyer profiles, lawyer directory"),
        (name = "cases", description = "Case intake, assignment and progression"),
        (name = "disputes", description = "Dispute filing, negotiation and escalation"),
        (name = "documents", description = "Document upload, review and sharing"),
        (name = "reminders", description = "Personal reminders"),
        (name = "reports", description = "Drafted and finalized reports"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "Counsel Desk API",
        description = "Case, dispute and document workflows between citizens and lawyers",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the full application: REST API under `/api/v1`, `/health`, and the
/// API docs at `/docs`.
///
/// Layer order, outermost first: request id assignment, request id
/// propagation, HTTP tracing, body limit, bearer token verification, OTLP
/// span. The OTLP span sits inside the auth layer so it can tag the caller's
/// claims.
pub fn build_app(state: AppState) -> Router {
    // Uploads arrive base64 encoded, a third larger than the file itself.
    let body_limit = state.settings.upload_max_bytes / 3 * 4 + 64 * 1024;
    let mut router = Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check));

    if crate::config::feature_flags().telemetry {
        router = router.layer(OtelTraceLayer);
    }

    router
        .layer(middleware::from_fn_with_state(state.jwt.clone(), auth_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
