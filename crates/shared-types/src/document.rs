use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::principal::{ActorRef, SharePermission, ShareGrant};

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "pdf", "doc", "docx", "txt", "xlsx", "xls",
];

/// Default upload ceiling: 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Returns the lowercased extension of `file_name` if it is on the allow list.
pub fn allowed_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DocumentCategory {
    Contract,
    Evidence,
    Court,
    Identification,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Approved => "approved",
            DocumentStatus::Rejected => "rejected",
        })
    }
}

/// Reference returned by the blob store; the document keeps only this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ShareSettings {
    pub is_public: bool,
    #[serde(default)]
    pub shared_with: Vec<ShareGrant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: DocumentCategory,
    pub file: FileMeta,
    pub status: DocumentStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub uploaded_by: ActorRef,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub share_settings: ShareSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Requests ────────────────────────────────────────────────────────

/// Upload body. `content` is the file encoded as standard base64.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct UploadDocumentRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title is required")))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: DocumentCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "File name is required"))
    )]
    pub file_name: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "No file uploaded")))]
    pub content: String,
}

fn default_content_type() -> String {
    "application/octet-stream".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title cannot be empty")))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<DocumentCategory>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReviewDocumentRequest {
    pub status: DocumentStatus,
}

/// Share update. Either grants `permission` to `principal`, toggles
/// `isPublic`, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ShareDocumentRequest {
    #[serde(default)]
    pub principal: Option<ActorRef>,
    #[serde(default)]
    pub permission: Option<SharePermission>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct DocumentListQuery {
    pub category: Option<DocumentCategory>,
    pub status: Option<DocumentStatus>,
    pub case_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub url: String,
    pub file_name: String,
    pub file_type: String,
}
