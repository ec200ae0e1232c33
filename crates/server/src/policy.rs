//! Role policy evaluator.
//!
//! `evaluate` answers the role-level question ("may a lawyer create a
//! case?") and names the row-level [`ScopeFilter`] that applies. Each
//! resource implements [`Scoped`] to say whether one row falls inside a
//! filter. [`check`] combines the two and decides between granting,
//! refusing with `Forbidden`, and hiding the row behind `NotFound`: a caller
//! who cannot even read a row must not learn that it exists.

use shared_types::{
    grant_for, AppError, Case, Dispute, Document, Principal, Reminder, Report, Role,
    SharePermission,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Case,
    Dispute,
    Document,
    Reminder,
    Report,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Case => "Case",
            ResourceKind::Dispute => "Dispute",
            ResourceKind::Document => "Document",
            ResourceKind::Reminder => "Reminder",
            ResourceKind::Report => "Report",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Read,
    /// Field edits; for disputes, hearings and deadlines.
    Update,
    Delete,
    /// Accept, reject or decline an assignment.
    Assign,
    /// Status change through the lifecycle.
    Transition,
    Share,
    /// Messages and settlement offers on a dispute.
    Communicate,
    Escalate,
    Review,
    Finalize,
}

/// Row-level restriction attached to an allowed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    /// No row exists yet (create).
    Unrestricted,
    /// Case owned by the caller.
    CitizenOwned,
    /// Case assigned to the caller, or unassigned and not requested from
    /// another lawyer.
    LawyerAvailableOrAssigned,
    /// Case owner or its assigned lawyer.
    CaseParticipant,
    /// Lawyer who holds the accepted assignment.
    AssignedLawyer,
    /// Dispute creator or a registered citizen party.
    DisputeParty,
    /// Assigned to, created by or notified to the caller, or still open
    /// for any lawyer to claim.
    DisputeLawyerView,
    /// Creator or accepted lawyer.
    DisputeParticipant,
    Owner,
    /// Owner or holder of an edit grant.
    OwnerOrEditor,
    /// Owner, any grantee, plus whatever the resource exposes through its
    /// case link or public flag.
    OwnerSharedOrLinked,
    /// Lawyer assigned to the case the row is linked to.
    LinkedCaseLawyer,
}

/// Outcome of the role-level evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub scope: ScopeFilter,
}

impl Decision {
    fn allow(scope: ScopeFilter) -> Self {
        Self { allowed: true, scope }
    }

    fn deny() -> Self {
        Self {
            allowed: false,
            scope: ScopeFilter::Owner,
        }
    }
}

/// The policy table.
pub fn evaluate(principal: &Principal, action: Action, kind: ResourceKind) -> Decision {
    use Action::*;
    use ResourceKind as K;
    use ScopeFilter as F;

    match (kind, action, principal.role) {
        (K::Case, Create, Role::Citizen) => Decision::allow(F::Unrestricted),
        (K::Case, Read, Role::Citizen) => Decision::allow(F::CitizenOwned),
        (K::Case, Read, Role::Lawyer) => Decision::allow(F::LawyerAvailableOrAssigned),
        (K::Case, Update, _) => Decision::allow(F::CaseParticipant),
        // Row eligibility for Assign is `assignment::check_claim`.
        (K::Case, Assign, Role::Lawyer) => Decision::allow(F::Unrestricted),
        (K::Case, Transition, Role::Lawyer) => Decision::allow(F::AssignedLawyer),

        (K::Dispute, Create, _) => Decision::allow(F::Unrestricted),
        (K::Dispute, Read, Role::Citizen) => Decision::allow(F::DisputeParty),
        (K::Dispute, Read, Role::Lawyer) => Decision::allow(F::DisputeLawyerView),
        (K::Dispute, Assign, Role::Lawyer) => Decision::allow(F::Unrestricted),
        (K::Dispute, Communicate | Transition, _) => Decision::allow(F::DisputeParticipant),
        (K::Dispute, Update | Escalate, Role::Lawyer) => Decision::allow(F::AssignedLawyer),

        (K::Document, Create, _) => Decision::allow(F::Unrestricted),
        (K::Document, Read, _) => Decision::allow(F::OwnerSharedOrLinked),
        (K::Document, Update, _) => Decision::allow(F::OwnerOrEditor),
        (K::Document, Delete | Share, _) => Decision::allow(F::Owner),
        (K::Document, Review, Role::Lawyer) => Decision::allow(F::LinkedCaseLawyer),

        (K::Reminder, Create, _) => Decision::allow(F::Unrestricted),
        (K::Reminder, Read | Update | Delete | Transition, _) => Decision::allow(F::Owner),

        (K::Report, Create, _) => Decision::allow(F::Unrestricted),
        (K::Report, Read, _) => Decision::allow(F::OwnerSharedOrLinked),
        (K::Report, Update, _) => Decision::allow(F::OwnerOrEditor),
        (K::Report, Delete | Share | Finalize, _) => Decision::allow(F::Owner),

        _ => Decision::deny(),
    }
}

/// Role-level gate. Fails with `Forbidden` before any row is loaded.
pub fn authorize(principal: &Principal, action: Action, kind: ResourceKind) -> Result<ScopeFilter, AppError> {
    let decision = evaluate(principal, action, kind);
    if decision.allowed {
        Ok(decision.scope)
    } else {
        Err(AppError::forbidden(denial_message(principal, action, kind)))
    }
}

fn denial_message(principal: &Principal, action: Action, kind: ResourceKind) -> String {
    match (kind, action) {
        (ResourceKind::Case, Action::Create) => "Only citizens can create cases".to_string(),
        (ResourceKind::Case | ResourceKind::Dispute, Action::Assign) => {
            format!("Only lawyers can accept {} assignments", kind.label().to_lowercase())
        }
        (ResourceKind::Dispute, Action::Escalate) => {
            "Only the assigned lawyer can escalate a dispute to a case".to_string()
        }
        _ => format!(
            "A {} is not authorized to perform this action on a {}",
            principal.role,
            kind.label().to_lowercase()
        ),
    }
}

/// Context a row cannot answer alone: the case it links to, and whether
/// the row's creator represents the viewer on some case.
#[derive(Debug, Clone, Default)]
pub struct Links {
    pub case: Option<Case>,
    pub creator_represents_viewer: bool,
}

impl Links {
    pub fn none() -> Self {
        Self::default()
    }

    fn case_lawyer_is(&self, who: &Principal) -> bool {
        who.is_lawyer()
            && self
                .case
                .as_ref()
                .is_some_and(|c| c.lawyer == Some(who.id))
    }

    fn case_citizen_is(&self, who: &Principal) -> bool {
        who.is_citizen() && self.case.as_ref().is_some_and(|c| c.citizen == who.id)
    }
}

/// A resource that can say whether it falls inside a scope filter.
pub trait Scoped {
    const RESOURCE: ResourceKind;

    fn admits(&self, scope: ScopeFilter, who: &Principal, links: &Links) -> bool;
}

impl Scoped for Case {
    const RESOURCE: ResourceKind = ResourceKind::Case;

    fn admits(&self, scope: ScopeFilter, who: &Principal, _links: &Links) -> bool {
        let mine_as_lawyer = who.is_lawyer() && self.lawyer == Some(who.id);
        match scope {
            ScopeFilter::Unrestricted => true,
            ScopeFilter::CitizenOwned => who.is_citizen() && self.citizen == who.id,
            ScopeFilter::LawyerAvailableOrAssigned => {
                mine_as_lawyer
                    || (who.is_lawyer()
                        && self.lawyer.is_none()
                        && self.requested_lawyer.is_none_or(|r| r == who.id))
            }
            ScopeFilter::CaseParticipant => {
                (who.is_citizen() && self.citizen == who.id) || mine_as_lawyer
            }
            ScopeFilter::AssignedLawyer => mine_as_lawyer,
            _ => false,
        }
    }
}

impl Scoped for Dispute {
    const RESOURCE: ResourceKind = ResourceKind::Dispute;

    fn admits(&self, scope: ScopeFilter, who: &Principal, _links: &Links) -> bool {
        let is_party = who.is_citizen()
            && (self.parties.plaintiff.citizen_id() == Some(who.id)
                || self.parties.defendant.citizen_id() == Some(who.id));
        match scope {
            ScopeFilter::Unrestricted => true,
            ScopeFilter::DisputeParty => self.is_creator(who) || is_party,
            ScopeFilter::DisputeLawyerView => {
                who.is_lawyer()
                    && (self.assigned_lawyer == Some(who.id)
                        || self.is_creator(who)
                        || (self.assigned_lawyer.is_none() && self.status.is_open_for_assignment())
                        || self.has_notified(who))
            }
            ScopeFilter::DisputeParticipant => self.is_participant(who),
            ScopeFilter::AssignedLawyer => self.is_assigned_to(who),
            _ => false,
        }
    }
}

impl Scoped for Document {
    const RESOURCE: ResourceKind = ResourceKind::Document;

    fn admits(&self, scope: ScopeFilter, who: &Principal, links: &Links) -> bool {
        let owner = self.uploaded_by.is(who);
        let grant = grant_for(&self.share_settings.shared_with, who);
        match scope {
            ScopeFilter::Unrestricted => true,
            ScopeFilter::Owner => owner,
            ScopeFilter::OwnerOrEditor => owner || grant == Some(SharePermission::Edit),
            ScopeFilter::OwnerSharedOrLinked => {
                owner || grant.is_some() || self.share_settings.is_public || links.case_lawyer_is(who)
            }
            ScopeFilter::LinkedCaseLawyer => links.case_lawyer_is(who),
            _ => false,
        }
    }
}

impl Scoped for Reminder {
    const RESOURCE: ResourceKind = ResourceKind::Reminder;

    fn admits(&self, scope: ScopeFilter, who: &Principal, _links: &Links) -> bool {
        match scope {
            ScopeFilter::Unrestricted => true,
            ScopeFilter::Owner => self.owner.is(who),
            _ => false,
        }
    }
}

impl Scoped for Report {
    const RESOURCE: ResourceKind = ResourceKind::Report;

    fn admits(&self, scope: ScopeFilter, who: &Principal, links: &Links) -> bool {
        let owner = self.created_by.is(who);
        let grant = grant_for(&self.shared_with, who);
        match scope {
            ScopeFilter::Unrestricted => true,
            ScopeFilter::Owner => owner,
            ScopeFilter::OwnerOrEditor => owner || grant == Some(SharePermission::Edit),
            ScopeFilter::OwnerSharedOrLinked => {
                owner
                    || grant.is_some()
                    || (self.is_final()
                        && (links.case_citizen_is(who)
                            || links.case_lawyer_is(who)
                            || (who.is_citizen() && links.creator_represents_viewer)))
            }
            _ => false,
        }
    }
}

/// Row-level outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Visible to the caller, but this action is not theirs to take.
    Denied,
    /// Outside the caller's read scope; reported as absent.
    Hidden,
}

impl Access {
    pub fn into_result(self, kind: ResourceKind, denied: &str) -> Result<(), AppError> {
        match self {
            Access::Granted => Ok(()),
            Access::Denied => Err(AppError::forbidden(denied)),
            Access::Hidden => Err(not_found(kind)),
        }
    }
}

pub fn not_found(kind: ResourceKind) -> AppError {
    AppError::not_found(format!("{} not found", kind.label()))
}

/// Decide `action` on one row.
pub fn access<T: Scoped>(who: &Principal, action: Action, record: &T, links: &Links) -> Access {
    let read_scope = evaluate(who, Action::Read, T::RESOURCE);
    let visible = read_scope.allowed && record.admits(read_scope.scope, who, links);
    let decision = evaluate(who, action, T::RESOURCE);

    if decision.allowed && record.admits(decision.scope, who, links) {
        Access::Granted
    } else if visible {
        Access::Denied
    } else {
        Access::Hidden
    }
}

/// [`access`] as a `Result`, with `denied` as the `Forbidden` message.
pub fn check<T: Scoped>(
    who: &Principal,
    action: Action,
    record: &T,
    links: &Links,
    denied: &str,
) -> Result<(), AppError> {
    authorize(who, action, T::RESOURCE)?;
    access(who, action, record, links).into_result(T::RESOURCE, denied)
}

/// Rows of a listing that fall inside the caller's read scope.
pub fn visible<'a, T: Scoped>(who: &'a Principal, links: &'a Links) -> impl Fn(&T) -> bool + 'a {
    let decision = evaluate(who, Action::Read, T::RESOURCE);
    move |record: &T| decision.allowed && record.admits(decision.scope, who, links)
}
