//! Request lifecycle: who may move a request and what each move does.
//!
//! ```text
//! Pending ──► In Progress | Completed | Rejected | DELETED
//! ```
//!
//! Admin transitions only leave `Pending`. Owners may soft-delete their own
//! requests from any live state and may hard-delete decided history; neither
//! touches the ledger.

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    models::{
        request::{Request, RequestStatus},
        user::User,
    },
    repositories::RequestRepository,
    services::ledger::LedgerDebit,
    types::{RequestId, UserId},
};

/// A planned status change, applied by the store as one unit together with
/// its optional ledger debit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub request_id: RequestId,
    pub to: RequestStatus,
    pub at: DateTime<Utc>,
    pub comments: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub debit: Option<LedgerDebit>,
}

impl StatusTransition {
    /// Writes the transition onto an in-memory copy of the request.
    pub fn apply_to(&self, request: &mut Request) {
        request.status = self.to;
        request.updated_at = self.at;
        if let Some(comments) = &self.comments {
            request.admin_comments = Some(comments.clone());
        }
        if self.completed_at.is_some() {
            request.completed_at = self.completed_at;
        }
        if self.rejected_at.is_some() {
            request.rejected_at = self.rejected_at;
        }
        if self.started_at.is_some() {
            request.started_at = self.started_at;
        }
    }
}

/// Checks that `actor` may transition `request`.
pub fn authorize(actor: &User, request: &Request) -> Result<(), AppError> {
    if !actor.has_admin_rights() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    if actor.company_id != request.company_id {
        return Err(AppError::Forbidden("Unauthorized".into()));
    }
    if actor.is_admin() && request.assigned_to.as_ref() != Some(&actor.id) {
        return Err(AppError::Forbidden("Not assigned to you".into()));
    }
    Ok(())
}

/// Plans moving `request` to `target`. The source must be `Pending`.
pub fn plan_transition(
    request: &Request,
    target: RequestStatus,
    comments: Option<String>,
    now: DateTime<Utc>,
) -> Result<StatusTransition, AppError> {
    if !request.is_pending() {
        return Err(AppError::NotPending);
    }

    let comments = comments.filter(|c| !c.trim().is_empty());
    let mut transition = StatusTransition {
        request_id: request.id.clone(),
        to: target,
        at: now,
        comments,
        completed_at: None,
        rejected_at: None,
        started_at: None,
        debit: None,
    };

    match target {
        RequestStatus::Completed => {
            transition.completed_at = Some(now);
            transition.debit = LedgerDebit::for_approval(request);
        }
        RequestStatus::Rejected => transition.rejected_at = Some(now),
        RequestStatus::InProgress => transition.started_at = Some(now),
        RequestStatus::Pending | RequestStatus::Deleted => {}
    }

    Ok(transition)
}

/// Loads, authorizes and applies an admin transition.
pub async fn transition(
    requests: &dyn RequestRepository,
    actor: &User,
    request_id: &RequestId,
    target: RequestStatus,
    comments: Option<String>,
) -> Result<Request, AppError> {
    let request = requests
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;

    authorize(actor, &request)?;
    let plan = plan_transition(&request, target, comments, Utc::now())?;

    let updated = requests.apply_transition(&plan).await?;
    tracing::info!(
        request_id = %updated.id,
        actor = %actor.id,
        status = %updated.status,
        debited = plan.debit.is_some(),
        "request status changed"
    );
    Ok(updated)
}

/// Owner soft delete: marks the request `DELETED` without touching balances.
pub async fn soft_delete(
    requests: &dyn RequestRepository,
    owner: &User,
    request_id: &RequestId,
) -> Result<(), AppError> {
    let request = requests
        .find_by_id(request_id)
        .await?
        .filter(|r| !r.is_deleted())
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;

    if request.user_id != owner.id {
        return Err(AppError::Forbidden("Unauthorized".into()));
    }

    if !requests.soft_delete(request_id, Utc::now()).await? {
        return Err(AppError::NotFound("Request not found".into()));
    }
    Ok(())
}

/// Physically removes the owner's requests in `status`. Each record is
/// deleted on its own; the result counts successes only.
pub async fn purge_history(
    requests: &dyn RequestRepository,
    owner: &UserId,
    status: RequestStatus,
) -> Result<u64, AppError> {
    let ids = requests.find_ids_by_owner_and_status(owner, status).await?;

    let mut deleted = 0;
    for id in &ids {
        match requests.delete(id).await {
            Ok(true) => deleted += 1,
            Ok(false) => {}
            Err(err) => tracing::warn!(request_id = %id, error = %err, "failed to delete request"),
        }
    }

    tracing::info!(owner = %owner, %status, deleted, requested = ids.len(), "purged request history");
    Ok(deleted)
}
