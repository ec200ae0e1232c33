//! Personal reminders. Only the owner ever sees one; anyone else gets
//! `NotFound`.

use chrono::Utc;
use shared_types::{
    AppError, CreateReminderRequest, Principal, Reminder, ReminderListQuery, UpdateReminderRequest,
};
use uuid::Uuid;

use super::{load, missing_reminder, set_text};
use crate::error_convert::ValidateRequest;
use crate::policy::{self, Action, Links, ResourceKind};
use crate::repo::{Step, Store};

const NOT_YOURS: &str = "Not authorized to access this reminder";

pub async fn create(store: &Store, who: &Principal, req: CreateReminderRequest) -> Result<Reminder, AppError> {
    policy::authorize(who, Action::Create, ResourceKind::Reminder)?;
    req.validate_request()?;
    let now = Utc::now();
    let reminder = Reminder {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        description: req.description,
        due_date: req.due_date,
        priority: req.priority,
        completed: false,
        completed_at: None,
        owner: who.actor(),
        case_id: req.case_id,
        case_name: req.case_name,
        created_at: now,
        updated_at: now,
    };
    store.insert(&reminder).await?;
    tracing::debug!(reminder_id = %reminder.id, "Reminder created");
    Ok(reminder)
}

/// The caller's reminders, soonest due first.
pub async fn list(store: &Store, who: &Principal, query: &ReminderListQuery) -> Result<Vec<Reminder>, AppError> {
    policy::authorize(who, Action::Read, ResourceKind::Reminder)?;
    let links = Links::none();
    let visible = policy::visible::<Reminder>(who, &links);
    let mut reminders: Vec<Reminder> = store
        .list_records::<Reminder>()
        .await?
        .into_iter()
        .filter(|r| visible(r))
        .filter(|r| query.completed.is_none_or(|c| r.completed == c))
        .collect();
    reminders.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    Ok(reminders)
}

pub async fn get(store: &Store, who: &Principal, id: Uuid) -> Result<Reminder, AppError> {
    let reminder: Reminder = load(store, id).await?;
    policy::check(who, Action::Read, &reminder, &Links::none(), NOT_YOURS)?;
    Ok(reminder)
}

pub async fn update(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: UpdateReminderRequest,
) -> Result<Reminder, AppError> {
    policy::authorize(who, Action::Update, ResourceKind::Reminder)?;
    req.validate_request()?;
    store
        .modify::<Reminder, _, _>(id, missing_reminder, |current| {
            policy::check(who, Action::Update, current, &Links::none(), NOT_YOURS)?;
            let now = Utc::now();
            let mut next = current.clone();
            set_text(&mut next.title, &req.title);
            if let Some(description) = &req.description {
                next.description = Some(description.clone());
            }
            if let Some(due_date) = req.due_date {
                next.due_date = due_date;
            }
            if let Some(priority) = req.priority {
                next.priority = priority;
            }
            if let Some(case_id) = req.case_id {
                next.case_id = Some(case_id);
            }
            if let Some(case_name) = &req.case_name {
                next.case_name = Some(case_name.clone());
            }
            if let Some(completed) = req.completed {
                if completed != next.completed {
                    next.set_completed(completed, now);
                }
            }
            next.updated_at = now;
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

pub async fn delete(store: &Store, who: &Principal, id: Uuid) -> Result<(), AppError> {
    let reminder: Reminder = load(store, id).await?;
    policy::check(who, Action::Delete, &reminder, &Links::none(), NOT_YOURS)?;
    store.delete::<Reminder>(id).await?;
    Ok(())
}

/// Flip the completion flag.
pub async fn toggle(store: &Store, who: &Principal, id: Uuid) -> Result<Reminder, AppError> {
    policy::authorize(who, Action::Transition, ResourceKind::Reminder)?;
    store
        .modify::<Reminder, _, _>(id, missing_reminder, |current| {
            policy::check(who, Action::Transition, current, &Links::none(), NOT_YOURS)?;
            let now = Utc::now();
            let mut next = current.clone();
            next.set_completed(!current.completed, now);
            next.updated_at = now;
            Ok(Step::Write(next.clone(), next))
        })
        .await
}
