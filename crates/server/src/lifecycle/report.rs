//! Reports: `draft → final`, one way.
//!
//! Drafts are private to their author and grantees. A final report also
//! reaches the people on its linked case and the clients its author
//! represents.

use chrono::Utc;
use shared_types::{
    upsert_grant, AppError, CreateReportRequest, Principal, Report, ReportListQuery, ReportStatus,
    ShareReportRequest, UpdateReportRequest,
};
use uuid::Uuid;

use super::{load, missing_report, require_readable_case, set_text, CaseIndex};
use crate::error_convert::ValidateRequest;
use crate::identity;
use crate::policy::{self, Action, ResourceKind};
use crate::repo::{Step, Store};

pub async fn create(store: &Store, who: &Principal, req: CreateReportRequest) -> Result<Report, AppError> {
    policy::authorize(who, Action::Create, ResourceKind::Report)?;
    req.validate_request()?;
    if let Some(case_id) = req.case_id {
        require_readable_case(store, who, case_id).await?;
    }
    let now = Utc::now();
    let report = Report {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        content: req.content,
        status: ReportStatus::Draft,
        report_type: req.report_type,
        created_by: who.actor(),
        case_id: req.case_id,
        case_name: req.case_name,
        tags: req.tags,
        shared_with: vec![],
        created_at: now,
        updated_at: now,
        last_modified: now,
    };
    store.insert(&report).await?;
    tracing::info!(report_id = %report.id, "Report created");
    Ok(report)
}

/// Every report the caller can read, most recently updated first.
async fn readable(store: &Store, who: &Principal) -> Result<Vec<Report>, AppError> {
    policy::authorize(who, Action::Read, ResourceKind::Report)?;
    let index = CaseIndex::load(store).await?;
    let mut reports: Vec<Report> = store
        .list_records::<Report>()
        .await?
        .into_iter()
        .filter(|r| {
            let links = index.links(r.case_id, r.created_by, who);
            let visible = policy::visible::<Report>(who, &links);
            visible(r)
        })
        .collect();
    reports.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(reports)
}

pub async fn list(store: &Store, who: &Principal, query: &ReportListQuery) -> Result<Vec<Report>, AppError> {
    Ok(readable(store, who)
        .await?
        .into_iter()
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .filter(|r| query.report_type.is_none_or(|t| r.report_type == t))
        .collect())
}

/// For a citizen: reports written by others that reach them, through a
/// grant or as a final report on one of their cases.
pub async fn shared_for_citizen(store: &Store, who: &Principal) -> Result<Vec<Report>, AppError> {
    if !who.is_citizen() {
        return Err(AppError::forbidden("Only citizens have shared reports"));
    }
    Ok(readable(store, who)
        .await?
        .into_iter()
        .filter(|r| !r.created_by.is(who))
        .collect())
}

pub async fn get(store: &Store, who: &Principal, id: Uuid) -> Result<Report, AppError> {
    let report: Report = load(store, id).await?;
    let links = CaseIndex::load(store).await?.links(report.case_id, report.created_by, who);
    policy::check(who, Action::Read, &report, &links, "Not authorized to view this report")?;
    Ok(report)
}

/// Edit fields. Status never changes here; once final, only the owner may
/// edit anything.
pub async fn update(
    store: &Store,
    who: &Principal,
    id: Uuid,
    req: UpdateReportRequest,
) -> Result<Report, AppError> {
    policy::authorize(who, Action::Update, ResourceKind::Report)?;
    req.validate_request()?;
    if let Some(case_id) = req.case_id {
        require_readable_case(store, who, case_id).await?;
    }
    let index = CaseIndex::load(store).await?;

    store
        .modify::<Report, _, _>(id, missing_report, |current| {
            let links = index.links(current.case_id, current.created_by, who);
            policy::check(who, Action::Update, current, &links, "Not authorized to update this report")?;
            if current.is_final() && !current.created_by.is(who) {
                return Err(AppError::forbidden("Only the author can change a final report"));
            }
            let now = Utc::now();
            let mut next = current.clone();
            set_text(&mut next.title, &req.title);
            if let Some(content) = &req.content {
                next.content = content.clone();
            }
            if let Some(report_type) = req.report_type {
                next.report_type = report_type;
            }
            if let Some(case_id) = req.case_id {
                next.case_id = Some(case_id);
            }
            if let Some(case_name) = &req.case_name {
                next.case_name = Some(case_name.clone());
            }
            if let Some(tags) = &req.tags {
                next.tags = tags.clone();
            }
            next.updated_at = now;
            next.last_modified = now;
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

pub async fn delete(store: &Store, who: &Principal, id: Uuid) -> Result<(), AppError> {
    let report: Report = load(store, id).await?;
    let links = CaseIndex::load(store).await?.links(report.case_id, report.created_by, who);
    policy::check(who, Action::Delete, &report, &links, "Only the author can delete this report")?;
    store.delete::<Report>(id).await?;
    tracing::info!(report_id = %id, "Report deleted");
    Ok(())
}

pub async fn share(store: &Store, who: &Principal, id: Uuid, req: ShareReportRequest) -> Result<Report, AppError> {
    policy::authorize(who, Action::Share, ResourceKind::Report)?;
    if req.principal.is(who) {
        return Err(AppError::bad_request("You cannot share a report with yourself"));
    }
    identity::require_actor(store, req.principal).await?;
    let index = CaseIndex::load(store).await?;

    store
        .modify::<Report, _, _>(id, missing_report, |current| {
            let links = index.links(current.case_id, current.created_by, who);
            policy::check(who, Action::Share, current, &links, "Only the author can share this report")?;
            let mut next = current.clone();
            upsert_grant(&mut next.shared_with, req.principal, req.permission);
            next.updated_at = Utc::now();
            Ok(Step::Write(next.clone(), next))
        })
        .await
}

#[tracing::instrument(skip(store), fields(author_id = %who.id))]
pub async fn finalize(store: &Store, who: &Principal, id: Uuid) -> Result<Report, AppError> {
    policy::authorize(who, Action::Finalize, ResourceKind::Report)?;
    let index = CaseIndex::load(store).await?;
    let report = store
        .modify::<Report, _, _>(id, missing_report, |current| {
            let links = index.links(current.case_id, current.created_by, who);
            policy::check(who, Action::Finalize, current, &links, "Only the author can finalize this report")?;
            if current.is_final() {
                return Err(AppError::invalid_transition("finalize report", current.status));
            }
            let now = Utc::now();
            let mut next = current.clone();
            next.status = ReportStatus::Final;
            next.updated_at = now;
            next.last_modified = now;
            Ok(Step::Write(next.clone(), next))
        })
        .await?;
    tracing::info!(report_id = %id, "Report finalized");
    Ok(report)
}
