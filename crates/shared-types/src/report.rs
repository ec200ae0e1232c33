use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::principal::{ActorRef, SharePermission, ShareGrant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Draft,
    Final,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportStatus::Draft => "draft",
            ReportStatus::Final => "final",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    CaseSummary,
    LegalAnalysis,
    ClientReport,
    CourtFiling,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub status: ReportStatus,
    pub report_type: ReportType,
    pub created_by: ActorRef,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub shared_with: Vec<ShareGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Report {
    pub fn is_final(&self) -> bool {
        self.status == ReportStatus::Final
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title is required")))]
    pub title: String,
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Content is required")))]
    pub content: String,
    #[serde(default)]
    pub report_type: ReportType,
    #[serde(default)]
    pub case_id: Option<Uuid>,
    #[serde(default)]
    pub case_name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Report edit. Status is deliberately absent: it only moves through finalize.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title cannot be empty")))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub report_type: Option<ReportType>,
    pub case_id: Option<Uuid>,
    pub case_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ShareReportRequest {
    pub principal: ActorRef,
    pub permission: SharePermission,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct ReportListQuery {
    pub status: Option<ReportStatus>,
    pub report_type: Option<ReportType>,
}
