use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use shared_types::{
    ActorRef, ApiResponse, AppError, Document, DocumentListQuery, DownloadLink, ReviewDocumentRequest, Role,
    ShareDocumentRequest, UpdateDocumentRequest, UploadDocumentRequest,
};

use super::parse_id;
use crate::auth::CurrentUser;
use crate::config::Settings;
use crate::lifecycle::document as documents;
use crate::repo::Store;
use crate::storage::Blobs;

/// POST /api/v1/documents
#[utoipa::path(
    post,
    path = "/api/v1/documents",
    request_body = UploadDocumentRequest,
    responses(
        (status = 201, description = "Document uploaded", body = ApiResponse<Document>),
        (status = 400, description = "Missing file, disallowed type or too large", body = AppError),
        (status = 502, description = "Blob storage unavailable", body = AppError)
    ),
    tag = "documents"
)]
pub async fn upload_document(
    State(store): State<Store>,
    State(blobs): State<Blobs>,
    State(settings): State<Settings>,
    CurrentUser(who): CurrentUser,
    Json(body): Json<UploadDocumentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Document>>), AppError> {
    let document = documents::upload(&store, &blobs, &who, body, settings.upload_max_bytes).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Document uploaded successfully", document)),
    ))
}

/// GET /api/v1/documents
#[utoipa::path(
    get,
    path = "/api/v1/documents",
    params(DocumentListQuery),
    responses(
        (status = 200, description = "Owned and shared documents", body = ApiResponse<Vec<Document>>)
    ),
    tag = "documents"
)]
pub async fn list_documents(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let found = documents::list(&store, &who, &query).await?;
    Ok(Json(ApiResponse::ok("Documents retrieved", found)))
}

/// GET /api/v1/documents/clients/all
#[utoipa::path(
    get,
    path = "/api/v1/documents/clients/all",
    responses(
        (status = 200, description = "Documents tied to the lawyer's assigned cases", body = ApiResponse<Vec<Document>>),
        (status = 403, description = "Caller is not a lawyer", body = AppError)
    ),
    tag = "documents"
)]
pub async fn list_client_documents(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<ApiResponse<Vec<Document>>>, AppError> {
    let found = documents::client_documents(&store, &who).await?;
    Ok(Json(ApiResponse::ok("Client documents retrieved", found)))
}

/// GET /api/v1/documents/{id}
#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 200, description = "Document metadata", body = ApiResponse<Document>),
        (status = 403, description = "Not authorized to view", body = AppError),
        (status = 404, description = "Document not found", body = AppError)
    ),
    tag = "documents"
)]
pub async fn get_document(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let id = parse_id(&id, "document")?;
    let document = documents::get(&store, &who, id).await?;
    Ok(Json(ApiResponse::ok("Document retrieved", document)))
}

/// PUT /api/v1/documents/{id}
#[utoipa::path(
    put,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document UUID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = ApiResponse<Document>),
        (status = 403, description = "Not the owner or an editor", body = AppError)
    ),
    tag = "documents"
)]
pub async fn update_document(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let id = parse_id(&id, "document")?;
    let document = documents::update(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Document updated successfully", document)))
}

/// PATCH /api/v1/documents/{id}/status
#[utoipa::path(
    patch,
    path = "/api/v1/documents/{id}/status",
    params(("id" = String, Path, description = "Document UUID")),
    request_body = ReviewDocumentRequest,
    responses(
        (status = 200, description = "Review recorded", body = ApiResponse<Document>),
        (status = 400, description = "Document already reviewed", body = AppError),
        (status = 403, description = "Not the lawyer of the linked case", body = AppError)
    ),
    tag = "documents"
)]
pub async fn review_document(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ReviewDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let id = parse_id(&id, "document")?;
    let document = documents::review(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Document status updated", document)))
}

/// DELETE /api/v1/documents/{id}
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 200, description = "Document deleted", body = ApiResponse<String>),
        (status = 403, description = "Only the owner can delete", body = AppError)
    ),
    tag = "documents"
)]
pub async fn delete_document(
    State(store): State<Store>,
    State(blobs): State<Blobs>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = parse_id(&id, "document")?;
    documents::delete(&store, &blobs, &who, id).await?;
    Ok(Json(ApiResponse::message("Document deleted successfully")))
}

/// POST /api/v1/documents/{id}/share
#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/share",
    params(("id" = String, Path, description = "Document UUID")),
    request_body = ShareDocumentRequest,
    responses(
        (status = 200, description = "Sharing updated", body = ApiResponse<Document>),
        (status = 400, description = "Nothing to change or sharing with self", body = AppError),
        (status = 403, description = "Only the owner can share", body = AppError)
    ),
    tag = "documents"
)]
pub async fn share_document(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
    Json(body): Json<ShareDocumentRequest>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let id = parse_id(&id, "document")?;
    let document = documents::share(&store, &who, id, body).await?;
    Ok(Json(ApiResponse::ok("Document shared successfully", document)))
}

/// DELETE /api/v1/documents/{id}/share/{kind}/{principal_id}
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}/share/{kind}/{principal_id}",
    params(
        ("id" = String, Path, description = "Document UUID"),
        ("kind" = String, Path, description = "`citizen` or `lawyer`"),
        ("principal_id" = String, Path, description = "Grantee UUID")
    ),
    responses(
        (status = 200, description = "Grant removed", body = ApiResponse<Document>),
        (status = 400, description = "Unknown principal kind", body = AppError),
        (status = 403, description = "Only the owner can revoke", body = AppError)
    ),
    tag = "documents"
)]
pub async fn revoke_share(
    State(store): State<Store>,
    CurrentUser(who): CurrentUser,
    Path((id, kind, principal_id)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<Document>>, AppError> {
    let id = parse_id(&id, "document")?;
    let role = Role::parse(&kind).ok_or_else(|| AppError::bad_request(format!("Unknown principal kind '{kind}'")))?;
    let principal = ActorRef::new(role, parse_id(&principal_id, "principal")?);
    let document = documents::revoke(&store, &who, id, principal).await?;
    Ok(Json(ApiResponse::ok("Share removed", document)))
}

/// GET /api/v1/documents/{id}/download
#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/download",
    params(("id" = String, Path, description = "Document UUID")),
    responses(
        (status = 200, description = "Download link", body = ApiResponse<DownloadLink>),
        (status = 404, description = "Document not found", body = AppError),
        (status = 502, description = "Blob storage unavailable", body = AppError)
    ),
    tag = "documents"
)]
pub async fn download_document(
    State(store): State<Store>,
    State(blobs): State<Blobs>,
    CurrentUser(who): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DownloadLink>>, AppError> {
    let id = parse_id(&id, "document")?;
    let link = documents::download(&store, &blobs, &who, id).await?;
    Ok(Json(ApiResponse::ok("Download link generated", link)))
}
