pub mod auth;
pub mod case;
pub mod dispute;
pub mod document;
pub mod profile;
pub mod reminder;
pub mod report;

use axum::{routing::{delete, get, patch, post, put}, Router};
use shared_types::AppError;
use uuid::Uuid;

use crate::db::AppState;

/// Parse a path segment as a UUID; malformed ids are a `BadRequest`.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::bad_request(format!("Invalid {what} UUID format")))
}

/// Build the REST API router. Every route lives under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Accounts
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/citizen/profile", get(profile::get_citizen_profile).put(profile::update_citizen_profile))
        .route("/api/v1/citizen/cases", get(case::list_citizen_cases))
        .route("/api/v1/lawyer/profile", get(profile::get_lawyer_profile).put(profile::update_lawyer_profile))
        .route("/api/v1/lawyer/cases", get(case::list_lawyer_cases))
        .route("/api/v1/lawyers", get(profile::list_lawyers))
        // Cases
        .route("/api/v1/cases", get(case::list_cases).post(case::create_case))
        .route("/api/v1/cases/{id}", get(case::get_case).put(case::update_case))
        .route("/api/v1/cases/{id}/assign", put(case::assign_case))
        .route("/api/v1/cases/{id}/status", patch(case::update_case_status))
        // Disputes
        .route("/api/v1/disputes", get(dispute::list_disputes))
        .route("/api/v1/disputes/create", post(dispute::create_dispute))
        .route("/api/v1/disputes/dashboard", get(dispute::get_dashboard))
        .route("/api/v1/disputes/notifications", get(dispute::list_notifications))
        .route("/api/v1/disputes/{id}", get(dispute::get_dispute))
        .route("/api/v1/disputes/{id}/accept", post(dispute::accept_dispute))
        .route("/api/v1/disputes/{id}/decline", post(dispute::decline_dispute))
        .route("/api/v1/disputes/{id}/messages", post(dispute::post_message))
        .route("/api/v1/disputes/{id}/messages/read", post(dispute::mark_messages_read))
        .route("/api/v1/disputes/{id}/notifications/read", post(dispute::mark_notifications_read))
        .route("/api/v1/disputes/{id}/status", patch(dispute::update_dispute_status))
        .route("/api/v1/disputes/{id}/hearing", post(dispute::schedule_hearing))
        .route("/api/v1/disputes/{id}/settlements", post(dispute::propose_settlement))
        .route("/api/v1/disputes/{id}/settlements/{offer_id}/respond", post(dispute::respond_settlement))
        .route("/api/v1/disputes/{id}/deadlines", post(dispute::add_deadline))
        .route("/api/v1/disputes/{id}/deadlines/{deadline_id}/complete", post(dispute::complete_deadline))
        .route("/api/v1/disputes/{id}/create-case", post(dispute::escalate_dispute))
        // Documents
        .route("/api/v1/documents", get(document::list_documents).post(document::upload_document))
        .route("/api/v1/documents/clients/all", get(document::list_client_documents))
        .route(
            "/api/v1/documents/{id}",
            get(document::get_document).put(document::update_document).delete(document::delete_document),
        )
        .route("/api/v1/documents/{id}/status", patch(document::review_document))
        .route("/api/v1/documents/{id}/share", post(document::share_document))
        .route("/api/v1/documents/{id}/share/{kind}/{principal_id}", delete(document::revoke_share))
        .route("/api/v1/documents/{id}/download", get(document::download_document))
        // Reminders
        .route("/api/v1/reminders", get(reminder::list_reminders).post(reminder::create_reminder))
        .route(
            "/api/v1/reminders/{id}",
            get(reminder::get_reminder).put(reminder::update_reminder).delete(reminder::delete_reminder),
        )
        .route("/api/v1/reminders/{id}/toggle", patch(reminder::toggle_reminder))
        // Reports
        .route("/api/v1/reports", get(report::list_reports).post(report::create_report))
        .route("/api/v1/reports/shared/all", get(report::list_shared_reports))
        .route(
            "/api/v1/reports/{id}",
            get(report::get_report).put(report::update_report).delete(report::delete_report),
        )
        .route("/api/v1/reports/{id}/share", post(report::share_report))
        .route("/api/v1/reports/{id}/finalize", patch(report::finalize_report))
}
