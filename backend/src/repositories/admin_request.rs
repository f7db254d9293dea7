use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::admin_request::{AdminRequest, AdminRequestStatus};
use crate::types::{AdminRequestId, CompanyId, UserId};

const ADMIN_REQUEST_COLUMNS: &str =
    "id, user_id, user_name, user_email, company_id, status, created_at, approved_at, rejected_at";

/// Repository trait for requests to become an admin.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRequestRepository: Send + Sync {
    async fn create(&self, request: &AdminRequest) -> Result<AdminRequest, AppError>;

    async fn find_by_id(&self, id: &AdminRequestId) -> Result<Option<AdminRequest>, AppError>;

    /// The user's open request, if any.
    async fn find_pending_for_user(&self, user_id: &UserId)
        -> Result<Option<AdminRequest>, AppError>;

    /// Open requests of a company, oldest first.
    async fn list_pending(&self, company_id: &CompanyId) -> Result<Vec<AdminRequest>, AppError>;

    /// Moves a pending request to `status`; `NotPending` if it was already
    /// decided.
    async fn decide(
        &self,
        id: &AdminRequestId,
        status: AdminRequestStatus,
        at: DateTime<Utc>,
    ) -> Result<AdminRequest, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgAdminRequestRepository {
    pool: PgPool,
}

impl PgAdminRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRequestRepository for PgAdminRequestRepository {
    async fn create(&self, request: &AdminRequest) -> Result<AdminRequest, AppError> {
        let query = format!(
            "INSERT INTO admin_requests ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {}",
            ADMIN_REQUEST_COLUMNS, ADMIN_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, AdminRequest>(&query)
            .bind(&request.id)
            .bind(&request.user_id)
            .bind(&request.user_name)
            .bind(&request.user_email)
            .bind(&request.company_id)
            .bind(request.status)
            .bind(request.created_at)
            .bind(request.approved_at)
            .bind(request.rejected_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                // One open request per user is enforced by a partial unique index.
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::BadRequest("You already have a pending request".into())
                }
                other => other.into(),
            })?;
        Ok(row)
    }

    async fn find_by_id(&self, id: &AdminRequestId) -> Result<Option<AdminRequest>, AppError> {
        let query = format!(
            "SELECT {} FROM admin_requests WHERE id = $1",
            ADMIN_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, AdminRequest>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AdminRequest>, AppError> {
        let query = format!(
            "SELECT {} FROM admin_requests WHERE user_id = $1 AND status = 'pending' LIMIT 1",
            ADMIN_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, AdminRequest>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_pending(&self, company_id: &CompanyId) -> Result<Vec<AdminRequest>, AppError> {
        let query = format!(
            "SELECT {} FROM admin_requests WHERE company_id = $1 AND status = 'pending' \
             ORDER BY created_at ASC, id ASC",
            ADMIN_REQUEST_COLUMNS
        );
        let rows = sqlx::query_as::<_, AdminRequest>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn decide(
        &self,
        id: &AdminRequestId,
        status: AdminRequestStatus,
        at: DateTime<Utc>,
    ) -> Result<AdminRequest, AppError> {
        let (approved_at, rejected_at) = match status {
            AdminRequestStatus::Approved => (Some(at), None),
            AdminRequestStatus::Rejected => (None, Some(at)),
            AdminRequestStatus::Pending => (None, None),
        };
        let query = format!(
            "UPDATE admin_requests SET status = $2, approved_at = $3, rejected_at = $4 \
             WHERE id = $1 AND status = 'pending' RETURNING {}",
            ADMIN_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<_, AdminRequest>(&query)
            .bind(id)
            .bind(status)
            .bind(approved_at)
            .bind(rejected_at)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(row),
            None => match self.find_by_id(id).await? {
                Some(_) => Err(AppError::NotPending),
                None => Err(AppError::NotFound("Request not found".into())),
            },
        }
    }
}
