use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::case::CaseType;
use crate::principal::{ActorRef, Principal};

// ── Enums ───────────────────────────────────────────────────────────

/// Dispute lifecycle:
/// `draft → pending → assigned → {mediation, negotiation} → court-prep →
/// court-hearing → resolved | dismissed | withdrawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum DisputeStatus {
    Draft,
    Pending,
    Assigned,
    Mediation,
    Negotiation,
    CourtPrep,
    CourtHearing,
    Resolved,
    Dismissed,
    Withdrawn,
}

impl DisputeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeStatus::Draft => "draft",
            DisputeStatus::Pending => "pending",
            DisputeStatus::Assigned => "assigned",
            DisputeStatus::Mediation => "mediation",
            DisputeStatus::Negotiation => "negotiation",
            DisputeStatus::CourtPrep => "court-prep",
            DisputeStatus::CourtHearing => "court-hearing",
            DisputeStatus::Resolved => "resolved",
            DisputeStatus::Dismissed => "dismissed",
            DisputeStatus::Withdrawn => "withdrawn",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DisputeStatus::Resolved | DisputeStatus::Dismissed | DisputeStatus::Withdrawn
        )
    }

    /// Statuses from which a lawyer may still claim the dispute.
    pub fn is_open_for_assignment(&self) -> bool {
        matches!(self, DisputeStatus::Draft | DisputeStatus::Pending)
    }

    /// Edges the assigned lawyer may drive through a status update.
    pub fn lawyer_can_move_to(&self, next: DisputeStatus) -> bool {
        use DisputeStatus::*;
        matches!(
            (self, next),
            (Assigned, Mediation)
                | (Assigned, Negotiation)
                | (Mediation, Negotiation)
                | (Negotiation, Mediation)
                | (Mediation, CourtPrep)
                | (Negotiation, CourtPrep)
                | (Mediation, Resolved)
                | (Negotiation, Resolved)
                | (CourtPrep, CourtHearing)
                | (CourtHearing, Resolved)
                | (CourtHearing, Dismissed)
        )
    }
}

impl fmt::Display for DisputeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum DisputeCategory {
    Civil,
    Criminal,
    Corporate,
    Family,
    Property,
    Contract,
    Employment,
    IntellectualProperty,
}

impl DisputeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisputeCategory::Civil => "civil",
            DisputeCategory::Criminal => "criminal",
            DisputeCategory::Corporate => "corporate",
            DisputeCategory::Family => "family",
            DisputeCategory::Property => "property",
            DisputeCategory::Contract => "contract",
            DisputeCategory::Employment => "employment",
            DisputeCategory::IntellectualProperty => "intellectual-property",
        }
    }

    /// Case type used when a dispute of this category is escalated.
    pub fn escalated_case_type(&self) -> CaseType {
        match self {
            DisputeCategory::Civil
            | DisputeCategory::Corporate
            | DisputeCategory::Contract
            | DisputeCategory::Employment => CaseType::Civil,
            DisputeCategory::Criminal => CaseType::Criminal,
            DisputeCategory::Family => CaseType::Family,
            DisputeCategory::Property => CaseType::Property,
            DisputeCategory::IntellectualProperty => CaseType::Others,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum DisputePriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    Unassigned,
    PendingAcceptance,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum HearingType {
    Mediation,
    Arbitration,
    Court,
    SettlementConference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Citizen,
    Lawyer,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    #[default]
    Message,
    StatusUpdate,
    DocumentShared,
    HearingScheduled,
    SettlementOffer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    Assignment,
    Message,
    Document,
    Hearing,
    StatusChange,
    Settlement,
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OfferStatus::Pending => "pending",
            OfferStatus::Accepted => "accepted",
            OfferStatus::Rejected => "rejected",
            OfferStatus::Withdrawn => "withdrawn",
        })
    }
}

// ── Embedded records ────────────────────────────────────────────────

/// One side of a dispute. Registered parties carry an id; external ones do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Party {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub kind: PartyKind,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

impl Party {
    /// Registered citizen behind this party, if any.
    pub fn citizen_id(&self) -> Option<Uuid> {
        match self.kind {
            PartyKind::Citizen => self.id,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Parties {
    pub plaintiff: Party,
    pub defendant: Party,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReadReceipt {
    pub reader: ActorRef,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DisputeMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: ActorRef,
    pub message_type: MessageType,
    pub is_private: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read_by: Vec<ReadReceipt>,
}

impl DisputeMessage {
    pub fn is_read_by(&self, reader: &Principal) -> bool {
        self.read_by.iter().any(|r| r.reader.is(reader))
    }

    /// Private notes are only visible to their sender.
    pub fn is_visible_to(&self, viewer: &Principal) -> bool {
        !self.is_private || self.sender.is(viewer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient: ActorRef,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SettlementOffer {
    pub id: Uuid,
    pub amount: f64,
    pub terms: String,
    pub offered_by: ActorRef,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DisputeDeadline {
    pub id: Uuid,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

// ── Record ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub parties: Parties,
    pub status: DisputeStatus,
    pub category: DisputeCategory,
    pub priority: DisputePriority,
    pub created_by: ActorRef,
    pub assigned_lawyer: Option<Uuid>,
    pub assignment_status: AssignmentStatus,
    #[serde(default)]
    pub assignment_date: Option<DateTime<Utc>>,
    /// Case opened from this dispute. Written at most once.
    #[serde(default)]
    pub related_case: Option<Uuid>,
    pub can_create_case: bool,
    #[serde(default)]
    pub next_hearing: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hearing_location: Option<String>,
    #[serde(default)]
    pub hearing_type: Option<HearingType>,
    #[serde(default)]
    pub messages: Vec<DisputeMessage>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub settlement_offers: Vec<SettlementOffer>,
    #[serde(default)]
    pub deadlines: Vec<DisputeDeadline>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Dispute {
    pub fn is_creator(&self, principal: &Principal) -> bool {
        self.created_by.is(principal)
    }

    pub fn is_assigned_to(&self, principal: &Principal) -> bool {
        principal.is_lawyer()
            && self.assignment_status == AssignmentStatus::Accepted
            && self.assigned_lawyer == Some(principal.id)
    }

    /// Creator or accepted lawyer: the two sides that converse on a dispute.
    pub fn is_participant(&self, principal: &Principal) -> bool {
        self.is_creator(principal) || self.is_assigned_to(principal)
    }

    /// The other participant, if one exists.
    pub fn counterpart_of(&self, principal: &Principal) -> Option<ActorRef> {
        if self.is_creator(principal) {
            match self.assignment_status {
                AssignmentStatus::Accepted => self.assigned_lawyer.map(ActorRef::Lawyer),
                _ => None,
            }
        } else {
            Some(self.created_by)
        }
    }

    pub fn has_notified(&self, principal: &Principal) -> bool {
        self.notifications.iter().any(|n| n.recipient.is(principal))
    }

    /// Stamp `updatedAt` and `lastActivity`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.last_activity = now;
    }
}

// ── Requests ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct PartyInput {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Party name is required")))]
    pub name: String,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub kind: Option<PartyKind>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateDisputeRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title is required")))]
    pub title: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Description is required"))
    )]
    pub description: String,
    pub category: DisputeCategory,
    #[serde(default)]
    pub priority: DisputePriority,
    #[cfg_attr(feature = "validation", validate(nested))]
    pub defendant: PartyInput,
    /// Display name for the plaintiff; defaults to the caller's account name.
    #[serde(default)]
    pub plaintiff_name: Option<String>,
    #[serde(default)]
    pub preferred_lawyer: Option<Uuid>,
    #[serde(default = "default_true")]
    pub can_create_case: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Message content is required"))
    )]
    pub content: String,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateDisputeStatusRequest {
    pub status: DisputeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ScheduleHearingRequest {
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    pub hearing_type: HearingType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct ProposeSettlementRequest {
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 0.0, message = "Amount must be non-negative"))
    )]
    pub amount: f64,
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Terms are required")))]
    pub terms: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum OfferResponse {
    Accept,
    Reject,
    Withdraw,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RespondSettlementRequest {
    pub response: OfferResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
#[serde(rename_all = "camelCase")]
pub struct AddDeadlineRequest {
    #[cfg_attr(feature = "validation", validate(length(min = 1, message = "Title is required")))]
    pub title: String,
    pub due_date: DateTime<Utc>,
}

/// `status` filter for dispute lists: a single status or one of the groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    /// pending, assigned, mediation, negotiation
    Active,
    /// resolved, dismissed, withdrawn
    Resolved,
    Exact(DisputeStatus),
}

impl StatusFilter {
    /// Group names win over the status of the same name, so `resolved`
    /// selects every terminal status.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(StatusFilter::All),
            "active" => Some(StatusFilter::Active),
            "resolved" => Some(StatusFilter::Resolved),
            other => serde_json::from_value(serde_json::Value::String(other.to_string()))
                .ok()
                .map(StatusFilter::Exact),
        }
    }

    pub fn admits(&self, status: DisputeStatus) -> bool {
        use DisputeStatus::*;
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => matches!(status, Pending | Assigned | Mediation | Negotiation),
            StatusFilter::Resolved => status.is_terminal(),
            StatusFilter::Exact(s) => *s == status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum AssignedFilter {
    #[default]
    All,
    Mine,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TimelineFilter {
    #[default]
    All,
    Today,
    Week,
}

/// Query parameters for `GET /disputes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct DisputeListQuery {
    /// A dispute status, or `all`, `active`, `resolved`.
    pub status: Option<String>,
    pub category: Option<DisputeCategory>,
    pub priority: Option<DisputePriority>,
    #[serde(default)]
    pub assigned: AssignedFilter,
    #[serde(default)]
    pub timeline: TimelineFilter,
    pub search: Option<String>,
}

// ── Views ───────────────────────────────────────────────────────────

/// A dispute as seen by one viewer: private notes of others removed, plus
/// viewer-relative computed fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DisputeView {
    #[serde(flatten)]
    pub dispute: Dispute,
    pub is_my_dispute: bool,
    pub is_assigned_to_me: bool,
    pub unread_messages: usize,
    pub has_upcoming_deadlines: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DisputeCreated {
    pub dispute: Dispute,
    /// Lawyers notified about the new dispute.
    pub suggested_lawyers: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct EscalationResult {
    pub case_id: Uuid,
    pub dispute: Dispute,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DashboardSummary {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DisputeDashboard {
    pub summary: DashboardSummary,
    pub upcoming_hearings: Vec<DisputeView>,
    pub recent_activity: Vec<DisputeView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NotificationEntry {
    pub dispute_id: Uuid,
    pub dispute_title: String,
    pub notification: Notification,
}
