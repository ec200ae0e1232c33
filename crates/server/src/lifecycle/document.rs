//! Document uploads, sharing and review.
//!
//! File bytes live in the blob store; the record keeps only the returned
//! reference. Review moves `pending → approved | rejected` once.

use std::collections::HashSet;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use shared_types::{
    allowed_extension, grant_for, upsert_grant, ActorRef, AppError, Case, Document, DocumentListQuery,
    DocumentStatus, DownloadLink, FileMeta, Principal, ReviewDocumentRequest, ShareDocumentRequest,
    SharePermission, ShareSettings, UpdateDocumentRequest, UploadDocumentRequest, ALLOWED_EXTENSIONS,
};
use uuid::Uuid;

use super::{case_links, load, missing_document, require_readable_case, set_text};
use crate::error_convert::ValidateRequest;
use crate::identity;
use crate::policy::{self, Action, ResourceKind};
use crate::repo::{Step, Store};
use crate::storage::{BlobStore, Blobs};

fn decode_upload(req: &UploadDocumentRequest, max_bytes: usize) -> Result<(String, Vec<u8>), AppError> {
    let ext = allowed_extension(&req.file_name).ok_or_else(|| {
        AppError::invalid_field(
            "fileName",
            format!("File type not allowed. Allowed types: {}", ALLOWED_EXTENSIONS.join(", ")),
        )
    })?;
    let bytes = STANDARD
        .decode(req.content.trim())
        .map_err(|_| AppError::invalid_field("content", "File content must be base64 encoded"))?;
    if bytes.is_empty() {
        return Err(AppError::invalid_field("content", "No file uploaded"));
    }
    if bytes.len() > max_bytes {
        return Err(AppError::invalid_field(
            "content",
            format!("File exceeds the maximum size of {max_bytes} bytes"),
        ));
    }
    Ok((ext, bytes))
}

#[tracing::instrument(skip(store, blobs, req), fields(uploader_id = %who.id))]
pub async fn upload(
    store: &Store,
    blobs: &Blobs,
    who: &Principal,
    req: UploadDocumentRequest,
    max_bytes: usize,
) -> Result<Document, AppError> {
    policy::authorize(who, Action::Create, ResourceKind::Document)?;
    req.validate_request()?;
    let (ext, bytes) = decode_upload(&req, max_bytes)?;
    if let Some(case_id) = req.case_id {
        require_readable_case(store, who, case_id).await?;
    }

    let id = Uuid::new_v4();
    let key = format!("documents/{id}.{ext}");
    let file_size = bytes.len() as u64;
    let blob = blobs
        .store(&key, &req.content_type, bytes)
        .await
        .map_err(|e| {
            tracing::error!(document_id = %id, error = %e, "Blob upload failed");
            AppError::upstream()
        })?;

    let now = Utc::now();
    let document = Document {
        id,
        title: req.title.trim().to_string(),
        description: req.description,
        category: req.category,
        file: FileMeta {
            file_name: req.file_name,
            file_type: req.content_type,
            file_size,
            url: blob.url,
            public_id: blob.public_id.clone(),
        },
        status: DocumentStatus::Pending,
        tags: req.tags,
        uploaded_by: who.actor(),
        case_id: req.case_id,
        share_settings: ShareSettings::default(),
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = store.insert(&document).await {
        if let Err(cleanup) = blobs.delete(&blob.public_id).await {
            tracing::warn!(document_id = %id, error = %cleanup, "Orphaned blob after failed insert");
        }
        return Err(e);
    }
    tracing::info!(document_id = %id, size = file_size, "Document uploaded");
    Ok(document)
}

/// Documents the caller uploaded or that were shared with them, newest first.
pub async fn list(store: &Store, who: &Principal, query: &DocumentListQuery) -> Result<Vec<Document>, AppError> {
    policy::authorize(who, Action::Read, ResourceKind::Document)?;
    let mut documents: Vec<Document> = store
        .list_records::<Document>()
        .await?
        .into_iter()
        .filter(|d| d.uploaded_by.is(who) || grant_for(&d.share_settings.shared_with, who).is_some())
        .filter(|d| query.category.is_none_or(|c| d.category == c))
        .filter(|d| query.status.is_none_or(|s| d.status == s))
        .filter(|d| query.case_id.is_none_or(|id| d.case_id == Some(id)))
        .collect();
    documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(documents)
}

/// For a lawyer: documents uploaded by the citizens of their assigned cases
/// or linked to those cases.
pub async fn client_documents(store: &Store, who: &Principal) -> Result<Vec<Document>, AppError> {
    if !who.is_lawyer() {
        return Err(AppError::forbidden("Only lawyers can view client documents"));
    }
    let cases: Vec<Case> = store
        .list_records::<Case>()
        .await?
        .into_iter()
        .filter(|c| c.lawyer == Some(who.id))
        .collect();
    let case_ids: HashSet<Uuid> = cases.iter().map(|c| c.id).collect();
    let clients: HashSet<ActorRef> = cases.iter().map(|c| ActorRef::Citizen(c.citizen)).collect();

    let mut documents: Vec<Document> = store
        .list_records::<Document>()
        .await?
        .into_iter()
        .filter(|d| clients.contains(&d.uploaded_by) || d.case_id.is_some_and(|id| case_ids.contains(&id)))
        .collect();
    documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(documents)
}

pub async fn get(store: &Store, who: &Principal, id: Uuid) -> Result<Document, AppError> {
    let document: Document = load(store, id).await?;
    let links = case_links(store, document.case_id).await?;
    policy::check(who, Action::Read, &document, &links, "Not authorized to view this document")?;
    Ok(document)
}

pub async fn update(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: UpdateDocumentRequest,
) -> Result<Document, AppError> {
    policy::authorize(who, Action::Update, ResourceKind::Document)?;
    req.validate_request()?;
    let existing: Document = load(store, id).await?;
    let links = case_links(store, existing.case_id).await?;

    store
        .modify::<Document, _, _>(id, missing_document, |current| {
            policy::check(who, Action::Update, current, &links, "Not authorized to update this document")?;
            let mut next = current.clone();
            set_text(&mut next.title, &req.title);
            if let Some(description) = &req.description {
                next.description = Some(description.clone());
            }
            if let Some(category) = req.category {
                next.category = category;
            }
            if let Some(tags) = &req.tags {
                next.tags = tags.clone();
            }
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

/// Review by the lawyer on the linked case.
#[tracing::instrument(skip(store, req), fields(lawyer_id = %who.id))]
pub async fn review(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: ReviewDocumentRequest,
) -> Result<Document, AppError> {
    policy::authorize(who, Action::Review, ResourceKind::Document)?;
    if req.status == DocumentStatus::Pending {
        return Err(AppError::bad_request("Review status must be approved or rejected"));
    }
    let existing: Document = load(store, id).await?;
    let links = case_links(store, existing.case_id).await?;

    let document = store
        .modify::<Document, _, _>(id, missing_document, |current| {
            policy::check(
                who,
                Action::Review,
                current,
                &links,
                "Only the lawyer on the linked case can review this document",
            )?;
            if current.status != DocumentStatus::Pending {
                return Err(AppError::invalid_transition("review document", current.status));
            }
            let mut next = current.clone();
            next.status = req.status;
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await?;
    tracing::info!(document_id = %id, status = %document.status, "Document reviewed");
    Ok(document)
}

/// Delete the record, then the blob. A failed blob delete is logged only.
#[tracing::instrument(skip(store, blobs), fields(uploader_id = %who.id))]
pub async fn delete(store: &Store, blobs: &Blobs, who: &Principal, id: Uuid) -> Result<(), AppError> {
    let document: Document = load(store, id).await?;
    let links = case_links(store, document.case_id).await?;
    policy::check(who, Action::Delete, &document, &links, "Only the uploader can delete this document")?;

    store.delete::<Document>(id).await?;
    if let Err(e) = blobs.delete(&document.file.public_id).await {
        tracing::warn!(document_id = %id, error = %e, "Blob delete failed; record already removed");
    }
    tracing::info!(document_id = %id, "Document deleted");
    Ok(())
}

pub async fn share(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: ShareDocumentRequest,
) -> Result<Document, AppError> {
    policy::authorize(who, Action::Share, ResourceKind::Document)?;
    if req.principal.is_none() && req.is_public.is_none() {
        return Err(AppError::bad_request("Nothing to share: give a principal or isPublic"));
    }
    if let Some(principal) = req.principal {
        if principal.is(who) {
            return Err(AppError::bad_request("You cannot share a document with yourself"));
        }
        identity::require_actor(store, principal).await?;
    }
    let existing: Document = load(store, id).await?;
    let links = case_links(store, existing.case_id).await?;

    store
        .modify::<Document, _, _>(id, missing_document, |current| {
            policy::check(who, Action::Share, current, &links, "Only the uploader can share this document")?;
            let mut next = current.clone();
            if let Some(principal) = req.principal {
                let permission = req.permission.unwrap_or(SharePermission::Read);
                upsert_grant(&mut next.share_settings.shared_with, principal, permission);
            }
            if let Some(is_public) = req.is_public {
                next.share_settings.is_public = is_public;
            }
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

/// Remove a grant. Revoking a grant that does not exist changes nothing.
pub async fn revoke(store: &Store, who: &Principal, id: Uuid, principal: ActorRef) -> Result<Document, AppError> {
    policy::authorize(who, Action::Share, ResourceKind::Document)?;
    let existing: Document = load(store, id).await?;
    let links = case_links(store, existing.case_id).await?;

    store
        .modify::<Document, _, _>(id, missing_document, |current| {
            policy::check(who, Action::Share, current, &links, "Only the uploader can share this document")?;
            let mut next = current.clone();
            next.share_settings.shared_with.retain(|g| g.principal != principal);
            if next.share_settings.shared_with.len() == current.share_settings.shared_with.len() {
                return Ok(Step::Keep(next));
            }
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

pub async fn download(store: &Store, blobs: &Blobs, who: &Principal, id: Uuid) -> Result<DownloadLink, AppError> {
    let document = get(store, who, id).await?;
    let url = blobs.download_url(&document.file.public_id).await.map_err(|e| {
        tracing::error!(document_id = %id, error = %e, "Download link failed");
        AppError::upstream()
    })?;
    Ok(DownloadLink {
        url,
        file_name: document.file.file_name,
        file_type: document.file.file_type,
    })
}
