//! Per-resource state machines.
//!
//! Each engine is a set of free async functions taking the [`Store`] and the
//! calling [`Principal`]. Authorization goes through [`crate::policy`];
//! writes that depend on the current state go through [`Store::modify`] or
//! an atomic batch.

pub mod case;
pub mod dispute;
pub mod document;
pub mod reminder;
pub mod report;

use std::collections::HashMap;

use shared_types::{ActorRef, AppError, Case, Principal};
use uuid::Uuid;

use crate::policy::{self, Action, Links, ResourceKind, Scoped};
use crate::repo::{Record, Store};

/// Load a record, or the `NotFound` error for its kind.
pub(crate) async fn load<T: Record + Scoped>(store: &Store, id: Uuid) -> Result<T, AppError> {
    store
        .get::<T>(id)
        .await?
        .map(|s| s.record)
        .ok_or_else(|| policy::not_found(T::RESOURCE))
}

pub(crate) fn missing_case() -> AppError {
    policy::not_found(ResourceKind::Case)
}

pub(crate) fn missing_dispute() -> AppError {
    policy::not_found(ResourceKind::Dispute)
}

pub(crate) fn missing_document() -> AppError {
    policy::not_found(ResourceKind::Document)
}

pub(crate) fn missing_reminder() -> AppError {
    policy::not_found(ResourceKind::Reminder)
}

pub(crate) fn missing_report() -> AppError {
    policy::not_found(ResourceKind::Report)
}

/// Every case, indexed for resolving the case links of documents and
/// reports within one request.
pub(crate) struct CaseIndex {
    cases: HashMap<Uuid, Case>,
}

impl CaseIndex {
    pub async fn load(store: &Store) -> Result<Self, AppError> {
        let cases = store
            .list_records::<Case>()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        Ok(Self { cases })
    }

    /// Links for a row tied to `case_id` and created by `creator`.
    pub fn links(&self, case_id: Option<Uuid>, creator: ActorRef, viewer: &Principal) -> Links {
        let creator_represents_viewer = match creator {
            ActorRef::Lawyer(lawyer_id) if viewer.is_citizen() => self
                .cases
                .values()
                .any(|c| c.citizen == viewer.id && c.lawyer == Some(lawyer_id)),
            _ => false,
        };
        Links {
            case: case_id.and_then(|id| self.cases.get(&id)).cloned(),
            creator_represents_viewer,
        }
    }
}

/// Single-row variant of [`CaseIndex::links`] without the representation
/// check, for documents.
pub(crate) async fn case_links(store: &Store, case_id: Option<Uuid>) -> Result<Links, AppError> {
    let case = match case_id {
        Some(id) => store.get::<Case>(id).await?.map(|s| s.record),
        None => None,
    };
    Ok(Links {
        case,
        creator_represents_viewer: false,
    })
}

/// A case link is only accepted for a case the caller can read.
pub(crate) async fn require_readable_case(store: &Store, who: &Principal, case_id: Uuid) -> Result<Case, AppError> {
    let case: Case = load(store, case_id).await?;
    policy::check(who, Action::Read, &case, &Links::none(), "Not authorized to view this case")?;
    Ok(case)
}

/// Apply an optional trimmed string edit.
pub(crate) fn set_text(slot: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *slot = v.trim().to_string();
    }
}
