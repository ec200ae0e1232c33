use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

// ── Enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    Civil,
    Criminal,
    Family,
    Property,
    Consumer,
    Others,
}

/// Case lifecycle: `pending → in progress → resolved → closed`, with the
/// terminal side branch `pending → rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum CaseStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
    #[serde(rename = "closed")]
    Closed,
    #[serde(rename = "rejected")]
    Rejected,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pending => "pending",
            CaseStatus::InProgress => "in progress",
            CaseStatus::Resolved => "resolved",
            CaseStatus::Closed => "closed",
            CaseStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CaseStatus::Closed | CaseStatus::Rejected)
    }

    /// Forward progress edges available to the assigned lawyer.
    pub fn can_progress_to(&self, next: CaseStatus) -> bool {
        matches!(
            (self, next),
            (CaseStatus::InProgress, CaseStatus::Resolved) | (CaseStatus::Resolved, CaseStatus::Closed)
        )
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Record ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub case_type: CaseType,
    pub status: CaseStatus,
    /// Owning citizen. Never changes after creation.
    pub citizen: Uuid,
    /// Assigned lawyer; set only by an accept.
    pub lawyer: Option<Uuid>,
    /// Preferred lawyer named by the citizen at creation.
    #[serde(default)]
    pub requested_lawyer: Option<Uuid>,
    /// Dispute this case was escalated from.
    #[serde(default)]
    pub origin_dispute: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Lawyer currently holding the assignment claim, accepted or requested.
    pub fn assignment_holder(&self) -> Option<Uuid> {
        self.lawyer.or(self.requested_lawyer)
    }
}

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateCaseRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title is required")))]
    pub title: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Description is required"))
    )]
    pub description: String,
    pub case_type: CaseType,
    #[serde(default)]
    pub lawyer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct UpdateCaseRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title cannot be empty")))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub case_type: Option<CaseType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AssignAction {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignCaseRequest {
    pub action: AssignAction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCaseStatusRequest {
    pub status: CaseStatus,
}

/// Query parameters for `GET /cases`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[serde(rename_all = "camelCase")]
pub struct CaseListQuery {
    pub status: Option<CaseStatus>,
    pub case_type: Option<CaseType>,
}
