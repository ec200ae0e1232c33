//! Case lifecycle: `pending → in progress → resolved → closed`, with the
//! terminal branch `pending → rejected`.
//!
//! The lawyer's assigned-case collection is not stored; it is the query
//! [`lawyer_cases`], so accept and reject write exactly one record.

use chrono::Utc;
use shared_types::{
    AppError, AssignAction, Case, CaseListQuery, CaseStatus, CreateCaseRequest, Principal,
    Transition, UpdateCaseRequest,
};
use uuid::Uuid;

use super::{load, missing_case, set_text};
use crate::assignment::{self, Claim, Eligibility, Intent};
use crate::error_convert::ValidateRequest;
use crate::identity;
use crate::policy::{self, Action, Links, ResourceKind};
use crate::repo::{Step, Store};

#[tracing::instrument(skip(store, req), fields(citizen_id = %who.id))]
pub async fn create(store: &Store, who: &Principal, req: CreateCaseRequest) -> Result<Case, AppError> {
    policy::authorize(who, Action::Create, ResourceKind::Case)?;
    req.validate_request()?;
    if let Some(lawyer_id) = req.lawyer_id {
        identity::require_lawyer(store, lawyer_id).await?;
    }

    let now = Utc::now();
    let case = Case {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        description: req.description.trim().to_string(),
        case_type: req.case_type,
        status: CaseStatus::Pending,
        citizen: who.id,
        lawyer: None,
        requested_lawyer: req.lawyer_id,
        origin_dispute: None,
        created_at: now,
        updated_at: now,
    };
    store.insert(&case).await?;
    tracing::info!(case_id = %case.id, "Case created");
    Ok(case)
}

/// Cases in the caller's read scope, newest first.
pub async fn list(store: &Store, who: &Principal, query: &CaseListQuery) -> Result<Vec<Case>, AppError> {
    policy::authorize(who, Action::Read, ResourceKind::Case)?;
    let links = Links::none();
    let visible = policy::visible::<Case>(who, &links);
    let mut cases: Vec<Case> = store
        .list_records::<Case>()
        .await?
        .into_iter()
        .filter(|c| visible(c))
        .filter(|c| query.status.is_none_or(|s| c.status == s))
        .filter(|c| query.case_type.is_none_or(|t| c.case_type == t))
        .collect();
    cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(cases)
}

/// Cases owned by the calling citizen, newest first.
pub async fn citizen_cases(store: &Store, who: &Principal) -> Result<Vec<Case>, AppError> {
    if !who.is_citizen() {
        return Err(AppError::forbidden("Only citizens have their own cases"));
    }
    let mut cases: Vec<Case> = store
        .list_records::<Case>()
        .await?
        .into_iter()
        .filter(|c| c.citizen == who.id)
        .collect();
    cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(cases)
}

/// The calling lawyer's assigned cases, newest first.
pub async fn lawyer_cases(store: &Store, who: &Principal) -> Result<Vec<Case>, AppError> {
    if !who.is_lawyer() {
        return Err(AppError::forbidden("Only lawyers have assigned cases"));
    }
    let mut cases: Vec<Case> = store
        .list_records::<Case>()
        .await?
        .into_iter()
        .filter(|c| c.lawyer == Some(who.id))
        .collect();
    cases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(cases)
}

pub async fn get(store: &Store, who: &Principal, id: Uuid) -> Result<Case, AppError> {
    let case: Case = load(store, id).await?;
    policy::check(who, Action::Read, &case, &Links::none(), "Not authorized to view this case")?;
    Ok(case)
}

/// Edit title, description or type. Closed and rejected cases are frozen.
pub async fn update(store: &Store, who: &Principal, id: Uuid, req: UpdateCaseRequest) -> Result<Case, AppError> {
    req.validate_request()?;
    store
        .modify::<Case, _, _>(id, missing_case, |current| {
            policy::check(
                who,
                Action::Update,
                current,
                &Links::none(),
                "Only the case owner or its assigned lawyer can edit this case",
            )?;
            if current.status.is_terminal() {
                return Err(AppError::invalid_transition("update case", current.status));
            }
            let mut next = current.clone();
            set_text(&mut next.title, &req.title);
            set_text(&mut next.description, &req.description);
            if let Some(t) = req.case_type {
                next.case_type = t;
            }
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

/// Accept or reject a pending case.
///
/// Accept sets the caller as `lawyer` and moves to `in progress`; a replay
/// by the same lawyer returns the case unchanged. Reject moves to
/// `rejected` and clears both the assigned and the requested lawyer.
#[tracing::instrument(skip(store), fields(lawyer_id = %who.id))]
pub async fn assign(
    store: &Store,
    who: &Principal,
    id: Uuid,
    action: AssignAction,
) -> Result<Transition<Case>, AppError> {
    policy::authorize(who, Action::Assign, ResourceKind::Case)?;
    let (intent, label) = match action {
        AssignAction::Accept => (Intent::Accept, "accept case"),
        AssignAction::Reject => (Intent::Refuse, "reject case"),
    };

    let outcome = store
        .modify::<Case, _, _>(id, missing_case, |current| {
            match assignment::check_claim(who, &Claim::from(current), intent, label)? {
                Eligibility::AlreadyHeld => Ok(Step::Keep(Transition::replayed(current.clone()))),
                Eligibility::Eligible => {
                    let mut next = current.clone();
                    match action {
                        AssignAction::Accept => {
                            next.status = CaseStatus::InProgress;
                            next.lawyer = Some(who.id);
                        }
                        AssignAction::Reject => {
                            next.status = CaseStatus::Rejected;
                            next.lawyer = None;
                            next.requested_lawyer = None;
                        }
                    }
                    next.updated_at = Utc::now();
                    Ok(Step::Write(next.clone(), Transition::applied(next)))
                }
            }
        })
        .await?;

    tracing::info!(
        case_id = %id,
        ?action,
        applied = outcome.applied,
        status = %outcome.record.status,
        "Case assignment decided"
    );
    Ok(outcome)
}

/// Forward progress by the assigned lawyer: `in progress → resolved → closed`.
pub async fn progress(store: &Store, who: &Principal, id: Uuid, next_status: CaseStatus) -> Result<Case, AppError> {
    policy::authorize(who, Action::Transition, ResourceKind::Case)?;
    let case = store
        .modify::<Case, _, _>(id, missing_case, |current| {
            policy::check(
                who,
                Action::Transition,
                current,
                &Links::none(),
                "Only the assigned lawyer can change the case status",
            )?;
            if !current.status.can_progress_to(next_status) {
                return Err(AppError::invalid_transition(
                    &format!("move case to '{next_status}'"),
                    current.status,
                ));
            }
            let mut next = current.clone();
            next.status = next_status;
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await?;
    tracing::info!(case_id = %id, status = %case.status, "Case status changed");
    Ok(case)
}
