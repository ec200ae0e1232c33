//! Dispute lifecycle.
//!
//! `draft → pending → assigned → {mediation, negotiation} → court-prep →
//! court-hearing → resolved | dismissed | withdrawn`, with assignment
//! tracked separately (`unassigned → pending-acceptance → accepted`, or
//! `declined` back to open). Every mutation appends to the ledger and
//! stamps `lastActivity`.

use chrono::{DateTime, Duration, Utc};
use shared_types::{
    ActorRef, AddDeadlineRequest, AppError, AssignedFilter, AssignmentStatus, Case, CaseStatus,
    CreateDisputeRequest, DashboardSummary, Dispute, DisputeDashboard, DisputeDeadline,
    DisputeListQuery, DisputeMessage, DisputeStatus, DisputeView, EscalationResult, MessageType,
    NotificationEntry, NotificationType, OfferResponse, OfferStatus, Parties, Party, PartyKind,
    PostMessageRequest, Principal, ProposeSettlementRequest, Role, ScheduleHearingRequest,
    SettlementOffer, StatusFilter, TimelineFilter, Transition,
};
use uuid::Uuid;

use super::{load, missing_dispute};
use crate::assignment::{self, Claim, Eligibility, Intent};
use crate::error_convert::ValidateRequest;
use crate::identity;
use crate::ledger;
use crate::policy::{self, Action, Links, ResourceKind};
use crate::repo::{Batch, Step, Store, MAX_CAS_ATTEMPTS};

/// Window for `hasUpcomingDeadlines`.
const DEADLINE_HORIZON_DAYS: i64 = 7;
const DASHBOARD_HEARINGS: usize = 5;
const DASHBOARD_RECENT: usize = 10;

const ACCEPTED_MESSAGE: &str =
    "Lawyer has accepted the dispute assignment and is now handling your case.";

/// The dispute as `viewer` may see it, with the viewer-relative fields.
pub fn view(mut dispute: Dispute, viewer: &Principal, now: DateTime<Utc>) -> DisputeView {
    let unread_messages = ledger::unread_count(&dispute, viewer);
    let horizon = now + Duration::days(DEADLINE_HORIZON_DAYS);
    let has_upcoming_deadlines = dispute
        .deadlines
        .iter()
        .any(|d| !d.completed && d.due_date >= now && d.due_date <= horizon);
    let is_my_dispute = dispute.is_creator(viewer);
    let is_assigned_to_me = dispute.is_assigned_to(viewer);
    ledger::redact_for(&mut dispute, viewer);
    DisputeView {
        dispute,
        is_my_dispute,
        is_assigned_to_me,
        unread_messages,
        has_upcoming_deadlines,
    }
}

fn party_from_input(input: shared_types::PartyInput) -> Party {
    let kind = input.kind.unwrap_or(if input.id.is_some() {
        PartyKind::Citizen
    } else {
        PartyKind::External
    });
    Party {
        id: input.id,
        name: input.name.trim().to_string(),
        kind,
        contact_email: input.contact_email,
        contact_phone: input.contact_phone,
    }
}

/// File a dispute.
///
/// With a preferred lawyer the dispute waits in `pending` for that lawyer's
/// answer. Without one it stays a `draft` and up to `candidate_limit`
/// matching lawyers are notified; any lawyer may claim it.
#[tracing::instrument(skip(store, req), fields(creator_id = %who.id))]
pub async fn create(
    store: &Store,
    who: &Principal,
    req: CreateDisputeRequest,
    candidate_limit: usize,
) -> Result<shared_types::DisputeCreated, AppError> {
    policy::authorize(who, Action::Create, ResourceKind::Dispute)?;
    req.validate_request()?;

    let (account_name, account_email) = identity::contact_of(store, who).await?;
    let defendant = party_from_input(req.defendant);
    if let Some(id) = defendant.citizen_id() {
        identity::require_actor(store, ActorRef::Citizen(id)).await?;
    }
    if let Some(lawyer_id) = req.preferred_lawyer {
        if who.is_lawyer() && lawyer_id == who.id {
            return Err(AppError::bad_request("You cannot request yourself as the lawyer"));
        }
        identity::require_lawyer(store, lawyer_id).await?;
    }

    let now = Utc::now();
    let title = req.title.trim().to_string();
    let mut dispute = Dispute {
        id: Uuid::new_v4(),
        title: title.clone(),
        description: req.description.trim().to_string(),
        parties: Parties {
            plaintiff: Party {
                id: Some(who.id),
                name: req.plaintiff_name.unwrap_or(account_name),
                kind: match who.role {
                    Role::Citizen => PartyKind::Citizen,
                    Role::Lawyer => PartyKind::Lawyer,
                },
                contact_email: Some(account_email),
                contact_phone: None,
            },
            defendant,
        },
        status: DisputeStatus::Draft,
        category: req.category,
        priority: req.priority,
        created_by: who.actor(),
        assigned_lawyer: None,
        assignment_status: AssignmentStatus::Unassigned,
        assignment_date: None,
        related_case: None,
        can_create_case: req.can_create_case,
        next_hearing: None,
        hearing_location: None,
        hearing_type: None,
        messages: vec![],
        notifications: vec![],
        settlement_offers: vec![],
        deadlines: vec![],
        created_at: now,
        updated_at: now,
        last_activity: now,
    };

    let suggested_lawyers = match req.preferred_lawyer {
        Some(lawyer_id) => {
            dispute.status = DisputeStatus::Pending;
            dispute.assigned_lawyer = Some(lawyer_id);
            dispute.assignment_status = AssignmentStatus::PendingAcceptance;
            let text = format!("New dispute \"{title}\" has been assigned to you for review.");
            ledger::notify(&mut dispute, ActorRef::Lawyer(lawyer_id), NotificationType::Assignment, text, now);
            vec![lawyer_id]
        }
        None => {
            let exclude = who.is_lawyer().then_some(who.id);
            let candidates =
                assignment::suggest_candidates(store, dispute.category, exclude, candidate_limit).await?;
            let text = format!(
                "New dispute \"{title}\" in {} category is available for assignment.",
                dispute.category
            );
            for lawyer_id in &candidates {
                ledger::notify(
                    &mut dispute,
                    ActorRef::Lawyer(*lawyer_id),
                    NotificationType::Assignment,
                    text.clone(),
                    now,
                );
            }
            candidates
        }
    };

    store.insert(&dispute).await?;
    tracing::info!(
        dispute_id = %dispute.id,
        status = %dispute.status,
        notified = suggested_lawyers.len(),
        "Dispute created"
    );
    Ok(shared_types::DisputeCreated {
        dispute,
        suggested_lawyers,
    })
}

fn in_timeline(d: &Dispute, timeline: TimelineFilter, now: DateTime<Utc>) -> bool {
    match timeline {
        TimelineFilter::All => true,
        TimelineFilter::Today => d.last_activity.date_naive() == now.date_naive(),
        TimelineFilter::Week => d.last_activity >= now - Duration::days(7),
    }
}

fn matches_search(d: &Dispute, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    d.title.to_lowercase().contains(&needle) || d.description.to_lowercase().contains(&needle)
}

/// Disputes in scope for `who`, most recent activity first.
async fn visible_disputes(store: &Store, who: &Principal) -> Result<Vec<Dispute>, AppError> {
    policy::authorize(who, Action::Read, ResourceKind::Dispute)?;
    let links = Links::none();
    let visible = policy::visible::<Dispute>(who, &links);
    let mut disputes: Vec<Dispute> = store
        .list_records::<Dispute>()
        .await?
        .into_iter()
        .filter(|d| visible(d))
        .collect();
    disputes.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    Ok(disputes)
}

pub async fn list(store: &Store, who: &Principal, query: &DisputeListQuery) -> Result<Vec<DisputeView>, AppError> {
    let status = match query.status.as_deref() {
        Some(raw) => StatusFilter::parse(raw)
            .ok_or_else(|| AppError::bad_request(format!("Unknown status filter '{raw}'")))?,
        None => StatusFilter::All,
    };
    let now = Utc::now();

    Ok(visible_disputes(store, who)
        .await?
        .into_iter()
        .filter(|d| status.admits(d.status))
        .filter(|d| query.category.is_none_or(|c| d.category == c))
        .filter(|d| query.priority.is_none_or(|p| d.priority == p))
        .filter(|d| match query.assigned {
            AssignedFilter::All => true,
            AssignedFilter::Mine => d.assigned_lawyer == Some(who.id) && who.is_lawyer(),
            AssignedFilter::Available => d.assigned_lawyer.is_none(),
        })
        .filter(|d| in_timeline(d, query.timeline, now))
        .filter(|d| query.search.as_deref().is_none_or(|s| matches_search(d, s)))
        .map(|d| view(d, who, now))
        .collect())
}

/// Summary for the caller's own disputes: those they filed (citizens) or
/// hold (lawyers).
pub async fn dashboard(store: &Store, who: &Principal) -> Result<DisputeDashboard, AppError> {
    let now = Utc::now();
    let mine: Vec<Dispute> = visible_disputes(store, who)
        .await?
        .into_iter()
        .filter(|d| match who.role {
            Role::Citizen => d.is_creator(who),
            Role::Lawyer => d.assigned_lawyer == Some(who.id),
        })
        .collect();

    let summary = DashboardSummary {
        total: mine.len(),
        active: mine
            .iter()
            .filter(|d| {
                matches!(
                    d.status,
                    DisputeStatus::Assigned | DisputeStatus::Mediation | DisputeStatus::Negotiation
                )
            })
            .count(),
        pending: mine.iter().filter(|d| d.status == DisputeStatus::Pending).count(),
        resolved: mine.iter().filter(|d| d.status == DisputeStatus::Resolved).count(),
    };

    let mut hearings: Vec<&Dispute> = mine
        .iter()
        .filter(|d| d.next_hearing.is_some_and(|h| h >= now))
        .collect();
    hearings.sort_by_key(|d| d.next_hearing);
    let upcoming_hearings = hearings
        .into_iter()
        .take(DASHBOARD_HEARINGS)
        .map(|d| view(d.clone(), who, now))
        .collect();

    let recent_activity = mine
        .into_iter()
        .take(DASHBOARD_RECENT)
        .map(|d| view(d, who, now))
        .collect();

    Ok(DisputeDashboard {
        summary,
        upcoming_hearings,
        recent_activity,
    })
}

/// Notifications addressed to the caller across visible disputes, newest first.
pub async fn notifications(store: &Store, who: &Principal) -> Result<Vec<NotificationEntry>, AppError> {
    let mut entries: Vec<NotificationEntry> = visible_disputes(store, who)
        .await?
        .iter()
        .flat_map(|d| {
            ledger::notifications_for(d, who)
                .into_iter()
                .map(|n| NotificationEntry {
                    dispute_id: d.id,
                    dispute_title: d.title.clone(),
                    notification: n.clone(),
                })
        })
        .collect();
    entries.sort_by(|a, b| b.notification.created_at.cmp(&a.notification.created_at));
    Ok(entries)
}

pub async fn get(store: &Store, who: &Principal, id: Uuid) -> Result<Dispute, AppError> {
    let dispute: Dispute = load(store, id).await?;
    policy::check(who, Action::Read, &dispute, &Links::none(), "Not authorized to view this dispute")?;
    Ok(dispute)
}

/// Claim a dispute. First writer wins; the winner's replay is a no-op.
#[tracing::instrument(skip(store), fields(lawyer_id = %who.id))]
pub async fn accept(store: &Store, who: &Principal, id: Uuid) -> Result<Transition<Dispute>, AppError> {
    policy::authorize(who, Action::Assign, ResourceKind::Dispute)?;
    let outcome = store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            match assignment::check_claim(who, &Claim::from(current), Intent::Accept, "accept dispute")? {
                Eligibility::AlreadyHeld => Ok(Step::Keep(Transition::replayed(current.clone()))),
                Eligibility::Eligible => {
                    let now = Utc::now();
                    let mut next = current.clone();
                    next.assigned_lawyer = Some(who.id);
                    next.assignment_status = AssignmentStatus::Accepted;
                    next.assignment_date = Some(now);
                    next.status = DisputeStatus::Assigned;
                    ledger::append_message(&mut next, who, ACCEPTED_MESSAGE, MessageType::StatusUpdate, false, now);
                    let text = format!("Lawyer has been assigned to your dispute \"{}\".", next.title);
                    let creator = next.created_by;
                    ledger::notify(&mut next, creator, NotificationType::Assignment, text, now);
                    Ok(Step::Write(next.clone(), Transition::applied(next)))
                }
            }
        })
        .await?;
    tracing::info!(dispute_id = %id, applied = outcome.applied, "Dispute accept decided");
    Ok(outcome)
}

/// The requested lawyer turns a dispute down; it reopens for anyone.
#[tracing::instrument(skip(store), fields(lawyer_id = %who.id))]
pub async fn decline(store: &Store, who: &Principal, id: Uuid) -> Result<Dispute, AppError> {
    policy::authorize(who, Action::Assign, ResourceKind::Dispute)?;
    let dispute = store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            assignment::check_claim(who, &Claim::from(current), Intent::Refuse, "decline dispute")?;
            if current.assignment_status != AssignmentStatus::PendingAcceptance {
                return Err(AppError::invalid_transition("decline dispute", current.status));
            }
            let now = Utc::now();
            let mut next = current.clone();
            next.assigned_lawyer = None;
            next.assignment_status = AssignmentStatus::Declined;
            next.status = DisputeStatus::Draft;
            next.touch(now);
            let text = format!(
                "The requested lawyer declined your dispute \"{}\". It is now open to other lawyers.",
                next.title
            );
            let creator = next.created_by;
            ledger::notify(&mut next, creator, NotificationType::Assignment, text, now);
            Ok(Step::Write(next.clone(), next))
        })
        .await?;
    tracing::info!(dispute_id = %id, "Dispute declined");
    Ok(dispute)
}

/// Append a participant message; returns the stored message.
pub async fn post_message(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: PostMessageRequest,
) -> Result<DisputeMessage, AppError> {
    policy::authorize(who, Action::Communicate, ResourceKind::Dispute)?;
    req.validate_request()?;
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(
                who,
                Action::Communicate,
                current,
                &Links::none(),
                "Only the dispute creator or the assigned lawyer can post messages",
            )?;
            let mut next = current.clone();
            let msg_id = ledger::post(&mut next, who, &req.content, req.message_type, req.is_private, Utc::now());
            let msg = next
                .messages
                .iter()
                .find(|m| m.id == msg_id)
                .cloned()
                .ok_or_else(|| AppError::internal("Appended message is missing"))?;
            Ok(Step::Write(next, msg))
        })
        .await
}

/// Record the caller's read receipt on every message they can see.
pub async fn mark_messages_read(store: &Store, who: &Principal, id: Uuid) -> Result<usize, AppError> {
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(who, Action::Read, current, &Links::none(), "Not authorized to view this dispute")?;
            let mut next = current.clone();
            match ledger::mark_messages_read(&mut next, who, Utc::now()) {
                0 => Ok(Step::Keep(0)),
                marked => Ok(Step::Write(next, marked)),
            }
        })
        .await
}

pub async fn mark_notifications_read(store: &Store, who: &Principal, id: Uuid) -> Result<usize, AppError> {
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(who, Action::Read, current, &Links::none(), "Not authorized to view this dispute")?;
            let mut next = current.clone();
            match ledger::mark_notifications_read(&mut next, who) {
                0 => Ok(Step::Keep(0)),
                marked => Ok(Step::Write(next, marked)),
            }
        })
        .await
}

/// Whether `who` may move `current` to `next`. The creator may only
/// withdraw; everything else belongs to the accepted lawyer.
fn check_status_change(who: &Principal, current: &Dispute, next: DisputeStatus) -> Result<(), AppError> {
    let action = format!("move dispute to '{next}'");
    if next == DisputeStatus::Withdrawn {
        if !current.is_creator(who) {
            return Err(AppError::forbidden("Only the dispute creator can withdraw it"));
        }
        if current.status.is_terminal() {
            return Err(AppError::invalid_transition(&action, current.status));
        }
        return Ok(());
    }
    if !current.is_assigned_to(who) {
        return Err(AppError::forbidden("Only the assigned lawyer can change the dispute status"));
    }
    if !current.status.lawyer_can_move_to(next) {
        return Err(AppError::invalid_transition(&action, current.status));
    }
    Ok(())
}

pub async fn update_status(
    store: &Store,
    who: &Principal,
    id: Uuid,
    next_status: DisputeStatus,
) -> Result<Dispute, AppError> {
    policy::authorize(who, Action::Transition, ResourceKind::Dispute)?;
    let dispute = store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(
                who,
                Action::Transition,
                current,
                &Links::none(),
                "Only the dispute creator or the assigned lawyer can change its status",
            )?;
            check_status_change(who, current, next_status)?;
            let now = Utc::now();
            let mut next = current.clone();
            let previous = next.status;
            next.status = next_status;
            ledger::append_message(
                &mut next,
                who,
                format!("Dispute status changed from {previous} to {next_status}"),
                MessageType::StatusUpdate,
                false,
                now,
            );
            if let Some(counterpart) = next.counterpart_of(who) {
                let text = format!("Dispute \"{}\" is now {next_status}", next.title);
                ledger::notify(&mut next, counterpart, NotificationType::StatusChange, text, now);
            }
            Ok(Step::Write(next.clone(), next))
        })
        .await?;
    tracing::info!(dispute_id = %id, status = %dispute.status, "Dispute status changed");
    Ok(dispute)
}

/// Shared guard for lawyer-only updates on a live dispute.
fn check_lawyer_update(who: &Principal, current: &Dispute, action: &str) -> Result<(), AppError> {
    policy::check(
        who,
        Action::Update,
        current,
        &Links::none(),
        "Only the assigned lawyer can do this",
    )?;
    if current.status.is_terminal() {
        return Err(AppError::invalid_transition(action, current.status));
    }
    Ok(())
}

pub async fn schedule_hearing(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: ScheduleHearingRequest,
) -> Result<Dispute, AppError> {
    policy::authorize(who, Action::Update, ResourceKind::Dispute)?;
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            check_lawyer_update(who, current, "schedule hearing")?;
            let now = Utc::now();
            let mut next = current.clone();
            next.next_hearing = Some(req.date);
            next.hearing_location = req.location.clone();
            next.hearing_type = Some(req.hearing_type);
            let when = req.date.format("%Y-%m-%d %H:%M UTC");
            ledger::append_message(
                &mut next,
                who,
                format!("Hearing scheduled for {when}"),
                MessageType::HearingScheduled,
                false,
                now,
            );
            let text = format!("A hearing for \"{}\" is scheduled for {when}", next.title);
            let creator = next.created_by;
            ledger::notify(&mut next, creator, NotificationType::Hearing, text, now);
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

pub async fn propose_settlement(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: ProposeSettlementRequest,
) -> Result<SettlementOffer, AppError> {
    policy::authorize(who, Action::Communicate, ResourceKind::Dispute)?;
    req.validate_request()?;
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(
                who,
                Action::Communicate,
                current,
                &Links::none(),
                "Only the dispute creator or the assigned lawyer can propose a settlement",
            )?;
            if current.status.is_terminal() {
                return Err(AppError::invalid_transition("propose settlement", current.status));
            }
            let now = Utc::now();
            let offer = SettlementOffer {
                id: Uuid::new_v4(),
                amount: req.amount,
                terms: req.terms.trim().to_string(),
                offered_by: who.actor(),
                status: OfferStatus::Pending,
                created_at: now,
                responded_at: None,
            };
            let mut next = current.clone();
            next.settlement_offers.push(offer.clone());
            ledger::append_message(
                &mut next,
                who,
                format!("Settlement offer of {:.2} proposed", offer.amount),
                MessageType::SettlementOffer,
                false,
                now,
            );
            if let Some(counterpart) = next.counterpart_of(who) {
                let text = format!("New settlement offer on dispute \"{}\"", next.title);
                ledger::notify(&mut next, counterpart, NotificationType::Settlement, text, now);
            }
            Ok(Step::Write(next, offer))
        })
        .await
}

/// Answer a pending offer. The offeror may only withdraw; the other side may
/// accept or reject.
pub async fn respond_settlement(
    store: &Store,
    who: &Principal,
    id: Uuid,
    offer_id: Uuid,
    response: OfferResponse,
) -> Result<SettlementOffer, AppError> {
    policy::authorize(who, Action::Communicate, ResourceKind::Dispute)?;
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(
                who,
                Action::Communicate,
                current,
                &Links::none(),
                "Only the dispute creator or the assigned lawyer can answer settlement offers",
            )?;
            let mut next = current.clone();
            let title = next.title.clone();
            let now = Utc::now();
            let offer = next
                .settlement_offers
                .iter_mut()
                .find(|o| o.id == offer_id)
                .ok_or_else(|| AppError::not_found("Settlement offer not found"))?;
            if offer.status != OfferStatus::Pending {
                return Err(AppError::invalid_transition("respond to settlement offer", offer.status));
            }
            let is_offeror = offer.offered_by.is(who);
            offer.status = match (response, is_offeror) {
                (OfferResponse::Withdraw, true) => OfferStatus::Withdrawn,
                (OfferResponse::Withdraw, false) => {
                    return Err(AppError::forbidden("Only the party who made the offer can withdraw it"));
                }
                (_, true) => {
                    return Err(AppError::forbidden("You cannot answer your own settlement offer"));
                }
                (OfferResponse::Accept, false) => OfferStatus::Accepted,
                (OfferResponse::Reject, false) => OfferStatus::Rejected,
            };
            offer.responded_at = Some(now);
            let answered = offer.clone();

            ledger::append_message(
                &mut next,
                who,
                format!("Settlement offer {}", answered.status),
                MessageType::SettlementOffer,
                false,
                now,
            );
            if let Some(counterpart) = next.counterpart_of(who) {
                let text = format!("Settlement offer on dispute \"{title}\" was {}", answered.status);
                ledger::notify(&mut next, counterpart, NotificationType::Settlement, text, now);
            }
            Ok(Step::Write(next, answered))
        })
        .await
}

pub async fn add_deadline(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: AddDeadlineRequest,
) -> Result<DisputeDeadline, AppError> {
    policy::authorize(who, Action::Update, ResourceKind::Dispute)?;
    req.validate_request()?;
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            check_lawyer_update(who, current, "add deadline")?;
            let now = Utc::now();
            let deadline = DisputeDeadline {
                id: Uuid::new_v4(),
                title: req.title.trim().to_string(),
                due_date: req.due_date,
                completed: false,
                completed_at: None,
            };
            let mut next = current.clone();
            next.deadlines.push(deadline.clone());
            next.touch(now);
            let text = format!("New deadline \"{}\" on dispute \"{}\"", deadline.title, next.title);
            let creator = next.created_by;
            ledger::notify(&mut next, creator, NotificationType::Deadline, text, now);
            Ok(Step::Write(next, deadline))
        })
        .await
}

/// Complete a deadline. Completing it again changes nothing.
pub async fn complete_deadline(
    store: &Store,
    who: &Principal,
    id: Uuid,
    deadline_id: Uuid,
) -> Result<DisputeDeadline, AppError> {
    policy::authorize(who, Action::Update, ResourceKind::Dispute)?;
    store
        .modify::<Dispute, _, _>(id, missing_dispute, |current| {
            policy::check(who, Action::Update, current, &Links::none(), "Only the assigned lawyer can do this")?;
            let mut next = current.clone();
            let now = Utc::now();
            let deadline = next
                .deadlines
                .iter_mut()
                .find(|d| d.id == deadline_id)
                .ok_or_else(|| AppError::not_found("Deadline not found"))?;
            if deadline.completed {
                return Ok(Step::Keep(deadline.clone()));
            }
            deadline.completed = true;
            deadline.completed_at = Some(now);
            let done = deadline.clone();
            next.touch(now);
            let text = format!("Deadline \"{}\" on dispute \"{}\" was completed", done.title, next.title);
            let creator = next.created_by;
            ledger::notify(&mut next, creator, NotificationType::Deadline, text, now);
            Ok(Step::Write(next, done))
        })
        .await
}

/// Open a case from a dispute.
///
/// Keyed on the dispute: once `relatedCase` is set, later calls return the
/// same case id without writing. The new case and the dispute update are
/// committed together.
#[tracing::instrument(skip(store), fields(lawyer_id = %who.id))]
pub async fn escalate(store: &Store, who: &Principal, id: Uuid) -> Result<Transition<EscalationResult>, AppError> {
    policy::authorize(who, Action::Escalate, ResourceKind::Dispute)?;

    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let current = store.get::<Dispute>(id).await?.ok_or_else(missing_dispute)?;
        let dispute = &current.record;
        policy::check(
            who,
            Action::Escalate,
            dispute,
            &Links::none(),
            "Only the assigned lawyer can escalate a dispute to a case",
        )?;

        if let Some(case_id) = dispute.related_case {
            let mut dispute = dispute.clone();
            ledger::redact_for(&mut dispute, who);
            return Ok(Transition::replayed(EscalationResult { case_id, dispute }));
        }
        if !dispute.can_create_case {
            return Err(AppError::bad_request("This dispute cannot be converted to a case"));
        }
        if dispute.status.is_terminal() {
            return Err(AppError::invalid_transition("escalate dispute", dispute.status));
        }
        let citizen = dispute.parties.plaintiff.citizen_id().ok_or_else(|| {
            AppError::bad_request("Only disputes filed by a registered citizen can become a case")
        })?;

        let now = Utc::now();
        let case = Case {
            id: Uuid::new_v4(),
            title: format!("Case: {}", dispute.title),
            description: format!("Escalated from dispute: {}", dispute.description),
            case_type: dispute.category.escalated_case_type(),
            status: CaseStatus::InProgress,
            citizen,
            lawyer: Some(who.id),
            requested_lawyer: None,
            origin_dispute: Some(dispute.id),
            created_at: now,
            updated_at: now,
        };

        let mut next = dispute.clone();
        next.related_case = Some(case.id);
        next.status = DisputeStatus::CourtPrep;
        ledger::append_message(
            &mut next,
            who,
            format!("Dispute has been escalated to a full legal case: {}", case.title),
            MessageType::StatusUpdate,
            false,
            now,
        );
        let text = format!("Your dispute \"{}\" has been escalated to a full legal case.", next.title);
        let creator = next.created_by;
        ledger::notify(&mut next, creator, NotificationType::StatusChange, text, now);

        let mut batch = Batch::new();
        batch.insert(&case)?.replace(&current, &next)?;
        if store.commit(batch).await? {
            tracing::info!(dispute_id = %id, case_id = %case.id, "Dispute escalated");
            ledger::redact_for(&mut next, who);
            return Ok(Transition::applied(EscalationResult {
                case_id: case.id,
                dispute: next,
            }));
        }
        tracing::debug!(dispute_id = %id, attempt, "Escalation lost a write race, retrying");
    }
    Err(AppError::conflict(
        "The dispute was modified by another request. Please retry.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{
        AppErrorKind, CitizenRegistration, DisputeCategory, DisputePriority, HearingType,
        LawyerRegistration, PartyInput, RegistrationRequest, Specialization,
    };

    async fn citizen(store: &Store, email: &str) -> Principal {
        let p = identity::register(
            store,
            RegistrationRequest::Citizen(CitizenRegistration {
                name: "Cara".into(),
                email: email.into(),
                password: "secret1".into(),
                phone: None,
                address: None,
            }),
        )
        .await
        .unwrap();
        Principal::citizen(p.id)
    }

    async fn lawyer(store: &Store, email: &str, spec: Specialization) -> Principal {
        let p = identity::register(
            store,
            RegistrationRequest::Lawyer(LawyerRegistration {
                name: "Lee".into(),
                email: email.into(),
                password: "secret1".into(),
                phone: None,
                specialization: Some(spec),
                license_number: email.into(),
                years_of_experience: None,
            }),
        )
        .await
        .unwrap();
        Principal::lawyer(p.id)
    }

    fn request(category: DisputeCategory, preferred: Option<Uuid>) -> CreateDisputeRequest {
        CreateDisputeRequest {
            title: "Custody schedule".into(),
            description: "Disagreement over weekends".into(),
            category,
            priority: DisputePriority::High,
            defendant: PartyInput {
                name: "Dan".into(),
                id: None,
                kind: None,
                contact_email: None,
                contact_phone: None,
            },
            plaintiff_name: None,
            preferred_lawyer: preferred,
            can_create_case: true,
        }
    }

    #[tokio::test]
    async fn open_dispute_notifies_at_most_three_matching_lawyers() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let criminal = lawyer(&store, "crim@law.test", Specialization::Criminal).await;
        let mut matching = Vec::new();
        for i in 0..4 {
            let spec = if i == 1 { Specialization::Other } else { Specialization::Family };
            matching.push(lawyer(&store, &format!("fam{i}@law.test"), spec).await);
        }

        let created = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap();
        let d = created.dispute;
        assert_eq!(d.status, DisputeStatus::Draft);
        assert_eq!(d.assignment_status, AssignmentStatus::Unassigned);
        assert_eq!(created.suggested_lawyers, matching[..3].iter().map(|p| p.id).collect::<Vec<_>>());
        assert_eq!(d.notifications.len(), 3);
        assert!(!d.has_notified(&criminal));
        assert_eq!(
            d.notifications[0].message,
            "New dispute \"Custody schedule\" in family category is available for assignment."
        );
    }

    #[tokio::test]
    async fn preferred_lawyer_gates_acceptance() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let preferred = lawyer(&store, "p@law.test", Specialization::Family).await;
        let other = lawyer(&store, "o@law.test", Specialization::Family).await;

        let d = create(&store, &c, request(DisputeCategory::Family, Some(preferred.id)), 3)
            .await
            .unwrap()
            .dispute;
        assert_eq!(d.status, DisputeStatus::Pending);
        assert_eq!(d.assignment_status, AssignmentStatus::PendingAcceptance);

        let err = accept(&store, &other, d.id).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);

        let declined = decline(&store, &preferred, d.id).await.unwrap();
        assert_eq!(declined.status, DisputeStatus::Draft);
        assert_eq!(declined.assignment_status, AssignmentStatus::Declined);

        let taken = accept(&store, &other, d.id).await.unwrap();
        assert!(taken.applied);
        assert_eq!(taken.record.assigned_lawyer, Some(other.id));
        assert_eq!(taken.record.status, DisputeStatus::Assigned);
    }

    #[tokio::test]
    async fn concurrent_dispute_accepts_leave_one_lawyer() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l1 = lawyer(&store, "l1@law.test", Specialization::Family).await;
        let l2 = lawyer(&store, "l2@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;

        let (a, b) = tokio::join!(accept(&store, &l1, d.id), accept(&store, &l2, d.id));
        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let stored = get(&store, &c, d.id).await.unwrap();
        assert_eq!(stored.assignment_status, AssignmentStatus::Accepted);
        let accepted_messages = stored
            .messages
            .iter()
            .filter(|m| m.content == ACCEPTED_MESSAGE)
            .count();
        assert_eq!(accepted_messages, 1);
    }

    #[tokio::test]
    async fn escalation_is_idempotent() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Corporate).await;
        let d = create(&store, &c, request(DisputeCategory::Corporate, None), 3).await.unwrap().dispute;
        accept(&store, &l, d.id).await.unwrap();

        let first = escalate(&store, &l, d.id).await.unwrap();
        assert!(first.applied);
        assert_eq!(first.record.dispute.status, DisputeStatus::CourtPrep);
        let second = escalate(&store, &l, d.id).await.unwrap();
        assert!(!second.applied);
        assert_eq!(second.record.case_id, first.record.case_id);

        let cases = store.list_records::<Case>().await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].case_type, shared_types::CaseType::Civil);
        assert_eq!(cases[0].citizen, c.id);
        assert_eq!(cases[0].lawyer, Some(l.id));
        assert_eq!(cases[0].status, CaseStatus::InProgress);
    }

    #[tokio::test]
    async fn escalation_needs_the_accepted_lawyer() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;

        // Visible (it is open and l was notified) but not yet accepted.
        let err = escalate(&store, &l, d.id).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
        let err = escalate(&store, &c, d.id).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn status_edges_and_withdrawal() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, d.id).await.unwrap();

        let err = update_status(&store, &l, d.id, DisputeStatus::CourtHearing).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidStateTransition);
        let err = update_status(&store, &c, d.id, DisputeStatus::Mediation).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);

        let moved = update_status(&store, &l, d.id, DisputeStatus::Mediation).await.unwrap();
        assert_eq!(moved.status, DisputeStatus::Mediation);
        assert!(moved
            .notifications
            .iter()
            .any(|n| n.recipient.is(&c) && n.kind == NotificationType::StatusChange));

        let withdrawn = update_status(&store, &c, d.id, DisputeStatus::Withdrawn).await.unwrap();
        assert_eq!(withdrawn.status, DisputeStatus::Withdrawn);
        let err = update_status(&store, &c, d.id, DisputeStatus::Withdrawn).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn settlement_answered_by_the_other_side_only() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, d.id).await.unwrap();

        let offer = propose_settlement(
            &store,
            &l,
            d.id,
            ProposeSettlementRequest {
                amount: 1500.0,
                terms: "Paid in two instalments".into(),
            },
        )
        .await
        .unwrap();

        let err = respond_settlement(&store, &l, d.id, offer.id, OfferResponse::Accept).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
        let accepted = respond_settlement(&store, &c, d.id, offer.id, OfferResponse::Accept).await.unwrap();
        assert_eq!(accepted.status, OfferStatus::Accepted);
        let err = respond_settlement(&store, &c, d.id, offer.id, OfferResponse::Reject).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::InvalidStateTransition);
    }

    #[tokio::test]
    async fn view_hides_private_notes_and_counts_unread() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, d.id).await.unwrap();

        post_message(
            &store,
            &l,
            d.id,
            PostMessageRequest {
                content: "Note to self".into(),
                message_type: MessageType::Message,
                is_private: true,
            },
        )
        .await
        .unwrap();

        let stored = get(&store, &c, d.id).await.unwrap();
        let as_citizen = view(stored, &c, Utc::now());
        assert!(as_citizen.is_my_dispute);
        assert!(as_citizen.dispute.messages.iter().all(|m| !m.is_private));
        // The accept system message is the only thing the citizen has not read.
        assert_eq!(as_citizen.unread_messages, 1);
        assert_eq!(mark_messages_read(&store, &c, d.id).await.unwrap(), 1);
        assert_eq!(mark_messages_read(&store, &c, d.id).await.unwrap(), 0);
    }

    fn note(content: &str) -> PostMessageRequest {
        PostMessageRequest {
            content: content.into(),
            message_type: MessageType::Message,
            is_private: true,
        }
    }

    fn hearing_in(days: i64) -> ScheduleHearingRequest {
        ScheduleHearingRequest {
            date: Utc::now() + Duration::days(days),
            location: Some("Room 4".into()),
            hearing_type: HearingType::Mediation,
        }
    }

    fn deadline_in(title: &str, days: i64) -> AddDeadlineRequest {
        AddDeadlineRequest {
            title: title.into(),
            due_date: Utc::now() + Duration::days(days),
        }
    }

    #[tokio::test]
    async fn escalation_result_leaves_out_the_citizens_private_notes() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, d.id).await.unwrap();
        post_message(&store, &c, d.id, note("Only for me")).await.unwrap();

        let first = escalate(&store, &l, d.id).await.unwrap();
        assert!(first.applied);
        assert!(first.record.dispute.messages.iter().all(|m| m.content != "Only for me"));
        let again = escalate(&store, &l, d.id).await.unwrap();
        assert!(!again.applied);
        assert!(again.record.dispute.messages.iter().all(|m| m.content != "Only for me"));

        // Still stored for its author.
        let stored = get(&store, &c, d.id).await.unwrap();
        let own = view(stored, &c, Utc::now());
        assert!(own.dispute.messages.iter().any(|m| m.content == "Only for me"));
    }

    #[tokio::test]
    async fn scheduling_a_hearing_records_it_and_tells_the_creator() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;

        let err = schedule_hearing(&store, &l, d.id, hearing_in(3)).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
        accept(&store, &l, d.id).await.unwrap();
        let err = schedule_hearing(&store, &c, d.id, hearing_in(3)).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);

        let req = hearing_in(3);
        let when = req.date;
        let updated = schedule_hearing(&store, &l, d.id, req).await.unwrap();
        assert_eq!(updated.next_hearing, Some(when));
        assert_eq!(updated.hearing_location.as_deref(), Some("Room 4"));
        assert_eq!(updated.hearing_type, Some(HearingType::Mediation));
        assert_eq!(
            updated.messages.last().map(|m| m.message_type),
            Some(MessageType::HearingScheduled)
        );
        assert!(ledger::notifications_for(&updated, &c)
            .iter()
            .any(|n| n.kind == NotificationType::Hearing));
    }

    #[tokio::test]
    async fn upcoming_deadline_flag_covers_the_next_seven_days() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, d.id).await.unwrap();

        let err = add_deadline(&store, &l, d.id, deadline_in("", 3)).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::ValidationError);

        add_deadline(&store, &l, d.id, deadline_in("Expert report", 10)).await.unwrap();
        let stored = get(&store, &c, d.id).await.unwrap();
        assert!(!view(stored, &c, Utc::now()).has_upcoming_deadlines);

        let soon = add_deadline(&store, &l, d.id, deadline_in("File response", 3)).await.unwrap();
        assert!(!soon.completed);
        let stored = get(&store, &c, d.id).await.unwrap();
        assert!(view(stored.clone(), &c, Utc::now()).has_upcoming_deadlines);
        assert!(view(stored, &l, Utc::now()).has_upcoming_deadlines);

        let err = complete_deadline(&store, &c, d.id, soon.id).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
        let err = complete_deadline(&store, &l, d.id, Uuid::new_v4()).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::NotFound);

        let done = complete_deadline(&store, &l, d.id, soon.id).await.unwrap();
        assert!(done.completed);
        let again = complete_deadline(&store, &l, d.id, soon.id).await.unwrap();
        assert_eq!(again.completed_at, done.completed_at);

        let stored = get(&store, &c, d.id).await.unwrap();
        assert_eq!(stored.deadlines.len(), 2);
        assert!(!view(stored, &c, Utc::now()).has_upcoming_deadlines);
    }

    #[tokio::test]
    async fn dashboard_counts_and_caps_its_lists() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let mut ids = Vec::new();
        for _ in 0..11 {
            let d = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
            ids.push(d.id);
        }
        for (i, id) in ids.iter().take(6).enumerate() {
            accept(&store, &l, *id).await.unwrap();
            schedule_hearing(&store, &l, *id, hearing_in(6 - i as i64)).await.unwrap();
        }
        update_status(&store, &l, ids[0], DisputeStatus::Mediation).await.unwrap();
        update_status(&store, &l, ids[0], DisputeStatus::Resolved).await.unwrap();

        let mine = dashboard(&store, &c).await.unwrap();
        assert_eq!(
            mine.summary,
            DashboardSummary {
                total: 11,
                active: 5,
                pending: 0,
                resolved: 1,
            }
        );
        assert_eq!(mine.upcoming_hearings.len(), 5);
        let hearings: Vec<_> = mine.upcoming_hearings.iter().map(|v| v.dispute.next_hearing).collect();
        assert!(hearings.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(mine.upcoming_hearings[0].dispute.id, ids[5]);
        assert_eq!(mine.recent_activity.len(), 10);
        assert_eq!(mine.recent_activity[0].dispute.id, ids[0]);

        let held = dashboard(&store, &l).await.unwrap();
        assert_eq!(held.summary.total, 6);
        assert!(held.recent_activity.iter().all(|v| v.is_assigned_to_me));
    }

    #[tokio::test]
    async fn list_filters_by_group_assignment_timeline_and_text() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let held = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, held.id).await.unwrap();
        let closed = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        accept(&store, &l, closed.id).await.unwrap();
        update_status(&store, &l, closed.id, DisputeStatus::Negotiation).await.unwrap();
        update_status(&store, &l, closed.id, DisputeStatus::Resolved).await.unwrap();
        let mut fence = request(DisputeCategory::Family, None);
        fence.title = "Garden FENCE boundary".into();
        let open = create(&store, &c, fence, 3).await.unwrap().dispute;

        let ids = |views: Vec<DisputeView>| views.into_iter().map(|v| v.dispute.id).collect::<Vec<_>>();
        let query = |f: fn(&mut DisputeListQuery)| {
            let mut q = DisputeListQuery::default();
            f(&mut q);
            q
        };

        let active = list(&store, &l, &query(|q| q.status = Some("active".into()))).await.unwrap();
        assert_eq!(ids(active), vec![held.id]);
        let resolved = list(&store, &c, &query(|q| q.status = Some("resolved".into()))).await.unwrap();
        assert_eq!(ids(resolved), vec![closed.id]);
        let drafts = list(&store, &c, &query(|q| q.status = Some("draft".into()))).await.unwrap();
        assert_eq!(ids(drafts), vec![open.id]);
        let err = list(&store, &c, &query(|q| q.status = Some("archived".into()))).await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::BadRequest);

        let mut mine = ids(list(&store, &l, &query(|q| q.assigned = AssignedFilter::Mine)).await.unwrap());
        mine.sort();
        let mut expected = vec![held.id, closed.id];
        expected.sort();
        assert_eq!(mine, expected);
        let available = list(&store, &l, &query(|q| q.assigned = AssignedFilter::Available)).await.unwrap();
        assert_eq!(ids(available), vec![open.id]);
        // "mine" only means held disputes, so a citizen gets nothing.
        assert!(list(&store, &c, &query(|q| q.assigned = AssignedFilter::Mine)).await.unwrap().is_empty());

        let found = list(&store, &c, &query(|q| q.search = Some("fence".into()))).await.unwrap();
        assert_eq!(ids(found), vec![open.id]);

        store
            .modify::<Dispute, _, _>(held.id, missing_dispute, |current| {
                let mut next = current.clone();
                next.last_activity = Utc::now() - Duration::days(10);
                Ok(Step::Write(next, ()))
            })
            .await
            .unwrap();
        let week = ids(list(&store, &c, &query(|q| q.timeline = TimelineFilter::Week)).await.unwrap());
        assert_eq!(week.len(), 2);
        assert!(!week.contains(&held.id));
        let everything = list(&store, &c, &DisputeListQuery::default()).await.unwrap();
        assert_eq!(everything.len(), 3);
        assert_eq!(everything[2].dispute.id, held.id);
    }

    #[tokio::test]
    async fn notification_feed_is_per_recipient_and_newest_first() {
        let store = Store::memory();
        let c = citizen(&store, "c@x.test").await;
        let l = lawyer(&store, "l@law.test", Specialization::Family).await;
        let other = lawyer(&store, "o@law.test", Specialization::Criminal).await;
        let first = create(&store, &c, request(DisputeCategory::Family, None), 3).await.unwrap().dispute;
        let mut req = request(DisputeCategory::Family, None);
        req.title = "Shared driveway".into();
        let second = create(&store, &c, req, 3).await.unwrap().dispute;

        let feed = notifications(&store, &l).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed
            .windows(2)
            .all(|w| w[0].notification.created_at >= w[1].notification.created_at));
        let mut titles: Vec<_> = feed.iter().map(|e| e.dispute_title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Custody schedule", "Shared driveway"]);
        assert!(notifications(&store, &other).await.unwrap().is_empty());
        assert!(notifications(&store, &c).await.unwrap().is_empty());

        accept(&store, &l, second.id).await.unwrap();
        let feed = notifications(&store, &c).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].dispute_id, second.id);
        assert_eq!(feed[0].notification.kind, NotificationType::Assignment);
        assert_ne!(feed[0].dispute_id, first.id);
    }
}
