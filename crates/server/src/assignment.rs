//! Lawyer assignment: who may claim a case or dispute, and which lawyers
//! are offered a new dispute.
//!
//! Both resources reduce to a [`Claim`] so that accepting a case and
//! accepting a dispute go through the same predicate. The predicate is
//! evaluated inside [`Store::modify`](crate::repo::Store::modify), so a
//! lawyer who loses an accept race re-evaluates against the winner's write.

use shared_types::{
    AppError, AssignmentStatus, Case, CaseStatus, Dispute, DisputeCategory, Lawyer, Principal,
};
use uuid::Uuid;

use crate::repo::Store;

/// Assignment-relevant view of a case or dispute.
#[derive(Debug, Clone)]
pub struct Claim {
    /// Current status, used in `InvalidStateTransition` messages.
    pub state_label: String,
    /// Whether the resource is still waiting for a lawyer.
    pub assignable: bool,
    /// Lawyer named on the resource, accepted or only requested.
    pub holder: Option<Uuid>,
    /// Lawyer whose accept already took effect.
    pub accepted_by: Option<Uuid>,
}

impl From<&Case> for Claim {
    fn from(case: &Case) -> Self {
        Self {
            state_label: case.status.to_string(),
            assignable: case.status == CaseStatus::Pending,
            holder: case.assignment_holder(),
            accepted_by: case.lawyer,
        }
    }
}

impl From<&Dispute> for Claim {
    fn from(d: &Dispute) -> Self {
        let accepted = d.assignment_status == AssignmentStatus::Accepted;
        Self {
            state_label: d.status.to_string(),
            assignable: !accepted && d.status.is_open_for_assignment(),
            holder: d.assigned_lawyer,
            accepted_by: if accepted { d.assigned_lawyer } else { None },
        }
    }
}

/// Result of a successful eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// The actor may apply the transition.
    Eligible,
    /// The actor's accept already took effect; nothing to write.
    AlreadyHeld,
}

/// The kind of assignment decision being made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Accept,
    /// Reject or decline.
    Refuse,
}

/// The single eligibility rule for lawyer self-assignment.
///
/// In order: a replayed accept is recognised; a resource held by another
/// lawyer is `Forbidden`; a resource that is no longer assignable is an
/// `InvalidStateTransition`; otherwise the actor is eligible.
pub fn check_claim(actor: &Principal, claim: &Claim, intent: Intent, action: &str) -> Result<Eligibility, AppError> {
    if !actor.is_lawyer() {
        return Err(AppError::forbidden("Only lawyers can take assignments"));
    }
    if intent == Intent::Accept && claim.accepted_by == Some(actor.id) {
        return Ok(Eligibility::AlreadyHeld);
    }
    if claim.holder.is_some_and(|holder| holder != actor.id) {
        return Err(AppError::forbidden("This assignment belongs to another lawyer"));
    }
    if !claim.assignable {
        return Err(AppError::invalid_transition(action, &claim.state_label));
    }
    Ok(Eligibility::Eligible)
}

/// Lawyers to notify about a dispute that names no preferred lawyer.
///
/// Registration order, no ranking: the first `limit` lawyers whose
/// specialization covers `category`, skipping `exclude`.
pub fn pick_candidates(
    lawyers: &[Lawyer],
    category: DisputeCategory,
    exclude: Option<Uuid>,
    limit: usize,
) -> Vec<Uuid> {
    lawyers
        .iter()
        .filter(|l| l.specialization.covers(category))
        .filter(|l| Some(l.id) != exclude)
        .map(|l| l.id)
        .take(limit)
        .collect()
}

pub async fn suggest_candidates(
    store: &Store,
    category: DisputeCategory,
    exclude: Option<Uuid>,
    limit: usize,
) -> Result<Vec<Uuid>, AppError> {
    let lawyers = store.list_records::<Lawyer>().await?;
    let picked = pick_candidates(&lawyers, category, exclude, limit);
    tracing::debug!(?category, candidates = picked.len(), "Suggested lawyers for dispute");
    Ok(picked)
}
