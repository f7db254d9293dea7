//! Request repository trait and its Postgres implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::{
    request::{Request, RequestRow, RequestStatus},
    user::LeaveBalance,
};
use crate::services::{ledger, lifecycle::StatusTransition};
use crate::types::{CompanyId, RequestId, UserId};

const REQUEST_COLUMNS: &str = "id, user_id, user_name, user_email, user_department, company_id, \
     category, request_type, title, description, priority, status, assigned_to, admin_comments, \
     leave_start, leave_end, leave_days, leave_type, deduct, \
     created_at, updated_at, completed_at, rejected_at, started_at";

/// Which requests a caller is allowed to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestScope {
    /// A plain user's own requests.
    Owner(UserId),
    /// Requests routed to one admin.
    Assignee {
        company_id: CompanyId,
        admin_id: UserId,
    },
    /// Every request in a company.
    Company(CompanyId),
}

impl RequestScope {
    pub fn matches(&self, request: &Request) -> bool {
        match self {
            RequestScope::Owner(owner) => &request.user_id == owner,
            RequestScope::Assignee {
                company_id,
                admin_id,
            } => &request.company_id == company_id && request.assigned_to.as_ref() == Some(admin_id),
            RequestScope::Company(company_id) => &request.company_id == company_id,
        }
    }
}

/// Repository trait for office requests.
///
/// Listings never include soft-deleted requests and are ordered newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepository: Send + Sync {
    async fn create(&self, request: &Request) -> Result<Request, AppError>;

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<Request>, AppError>;

    async fn list(&self, scope: &RequestScope) -> Result<Vec<Request>, AppError>;

    /// Pending requests of a company assigned to `admin_id` or to nobody.
    async fn list_unassigned(
        &self,
        company_id: &CompanyId,
        admin_id: &UserId,
    ) -> Result<Vec<Request>, AppError>;

    /// Applies a planned transition and its ledger debit as one unit.
    ///
    /// Fails with `NotPending` when the request already left `Pending`, in
    /// which case nothing is written.
    async fn apply_transition(&self, transition: &StatusTransition) -> Result<Request, AppError>;

    /// Marks a live request `DELETED`; returns whether a request changed.
    async fn soft_delete(&self, id: &RequestId, at: DateTime<Utc>) -> Result<bool, AppError>;

    async fn find_ids_by_owner_and_status(
        &self,
        owner: &UserId,
        status: RequestStatus,
    ) -> Result<Vec<RequestId>, AppError>;

    /// Physically removes a request; returns whether it existed.
    async fn delete(&self, id: &RequestId) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgRequestRepository {
    pool: PgPool,
}

impl PgRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_requests(rows: Vec<RequestRow>) -> Result<Vec<Request>, AppError> {
    rows.into_iter()
        .map(|row| Request::try_from(row).map_err(AppError::from))
        .collect()
}

#[async_trait]
impl RequestRepository for PgRequestRepository {
    async fn create(&self, request: &Request) -> Result<Request, AppError> {
        let query = format!(
            "INSERT INTO requests ({}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
              $15, $16, $17, $18, $19, $20, $21, $22, $23, $24) \
             RETURNING {}",
            REQUEST_COLUMNS, REQUEST_COLUMNS
        );
        let leave = request.kind.leave();
        let row = sqlx::query_as::<_, RequestRow>(&query)
            .bind(&request.id)
            .bind(&request.user_id)
            .bind(&request.user_name)
            .bind(&request.user_email)
            .bind(&request.user_department)
            .bind(&request.company_id)
            .bind(&request.category)
            .bind(request.kind.request_type().as_str())
            .bind(&request.title)
            .bind(&request.description)
            .bind(&request.priority)
            .bind(request.status)
            .bind(&request.assigned_to)
            .bind(&request.admin_comments)
            .bind(leave.map(|l| l.start_date))
            .bind(leave.map(|l| l.end_date))
            .bind(leave.map(|l| l.days))
            .bind(leave.map(|l| l.leave_type.clone()))
            .bind(leave.is_some_and(|l| l.deduct))
            .bind(request.created_at)
            .bind(request.updated_at)
            .bind(request.completed_at)
            .bind(request.rejected_at)
            .bind(request.started_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(Request::try_from(row)?)
    }

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<Request>, AppError> {
        let query = format!("SELECT {} FROM requests WHERE id = $1", REQUEST_COLUMNS);
        let row = sqlx::query_as::<_, RequestRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Request::try_from)
            .transpose()
            .map_err(AppError::from)
    }

    async fn list(&self, scope: &RequestScope) -> Result<Vec<Request>, AppError> {
        let mut builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(format!(
            "SELECT {} FROM requests WHERE status <> 'DELETED'",
            REQUEST_COLUMNS
        ));
        match scope {
            RequestScope::Owner(owner) => {
                builder.push(" AND user_id = ").push_bind(owner.clone());
            }
            RequestScope::Assignee {
                company_id,
                admin_id,
            } => {
                builder
                    .push(" AND company_id = ")
                    .push_bind(company_id.clone())
                    .push(" AND assigned_to = ")
                    .push_bind(admin_id.clone());
            }
            RequestScope::Company(company_id) => {
                builder.push(" AND company_id = ").push_bind(company_id.clone());
            }
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder
            .build_query_as::<RequestRow>()
            .fetch_all(&self.pool)
            .await?;
        into_requests(rows)
    }

    async fn list_unassigned(
        &self,
        company_id: &CompanyId,
        admin_id: &UserId,
    ) -> Result<Vec<Request>, AppError> {
        let query = format!(
            "SELECT {} FROM requests \
             WHERE company_id = $1 AND status = 'Pending' \
               AND (assigned_to = $2 OR assigned_to IS NULL) \
             ORDER BY created_at DESC, id DESC",
            REQUEST_COLUMNS
        );
        let rows = sqlx::query_as::<_, RequestRow>(&query)
            .bind(company_id)
            .bind(admin_id)
            .fetch_all(&self.pool)
            .await?;
        into_requests(rows)
    }

    async fn apply_transition(&self, transition: &StatusTransition) -> Result<Request, AppError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "UPDATE requests SET status = $2, updated_at = $3, \
             admin_comments = COALESCE($4, admin_comments), \
             completed_at = COALESCE($5, completed_at), \
             rejected_at = COALESCE($6, rejected_at), \
             started_at = COALESCE($7, started_at) \
             WHERE id = $1 AND status = 'Pending' \
             RETURNING {}",
            REQUEST_COLUMNS
        );
        let updated = sqlx::query_as::<_, RequestRow>(&query)
            .bind(&transition.request_id)
            .bind(transition.to)
            .bind(transition.at)
            .bind(&transition.comments)
            .bind(transition.completed_at)
            .bind(transition.rejected_at)
            .bind(transition.started_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = updated else {
            tx.rollback().await?;
            let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM requests WHERE id = $1")
                .bind(&transition.request_id)
                .fetch_one(&self.pool)
                .await?;
            return Err(if exists > 0 {
                AppError::NotPending
            } else {
                AppError::NotFound("Request not found".into())
            });
        };

        if let Some(debit) = &transition.debit {
            let balance = sqlx::query_as::<_, LeaveBalance>(
                "SELECT leave_annual, leave_sick, leave_personal, leave_emergency \
                 FROM users WHERE id = $1 FOR UPDATE",
            )
            .bind(&debit.user_id)
            .fetch_optional(&mut *tx)
            .await?;

            match balance {
                Some(balance) => {
                    let next = ledger::apply_debit(balance, debit);
                    sqlx::query(
                        "UPDATE users SET leave_annual = $2, leave_sick = $3, \
                         leave_personal = $4, leave_emergency = $5, updated_at = NOW() \
                         WHERE id = $1",
                    )
                    .bind(&debit.user_id)
                    .bind(next.annual)
                    .bind(next.sick)
                    .bind(next.personal)
                    .bind(next.emergency)
                    .execute(&mut *tx)
                    .await?;
                }
                None => tracing::warn!(
                    request_id = %transition.request_id,
                    user_id = %debit.user_id,
                    "request owner no longer exists; skipping leave deduction"
                ),
            }
        }

        tx.commit().await?;
        Ok(Request::try_from(row)?)
    }

    async fn soft_delete(&self, id: &RequestId, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE requests SET status = 'DELETED', updated_at = $2 \
             WHERE id = $1 AND status <> 'DELETED'",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_ids_by_owner_and_status(
        &self,
        owner: &UserId,
        status: RequestStatus,
    ) -> Result<Vec<RequestId>, AppError> {
        let ids = sqlx::query_scalar::<_, RequestId>(
            "SELECT id FROM requests WHERE user_id = $1 AND status = $2",
        )
        .bind(owner)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn delete(&self, id: &RequestId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
