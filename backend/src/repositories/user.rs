//! User repository trait and its Postgres implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppError;
use crate::models::user::User;
use crate::types::{CompanyId, UserId};

const USER_COLUMNS: &str = "id, company_id, email, full_name, role, department, job_title, \
     leave_annual, leave_sick, leave_personal, leave_emergency, last_login_at, created_at, updated_at";

/// Repository trait for user profiles.
///
/// "First" always means earliest `created_at`, ties broken by id, so routing
/// is deterministic when several users qualify.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by identity-provider uid.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError>;

    /// Insert a new user profile.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Persist name, role, department and job title of an existing user.
    ///
    /// Leave counters move only through request transitions and
    /// `last_login_at` only through [`record_login`](Self::record_login).
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Remove a user; returns whether a row was deleted.
    async fn delete(&self, id: &UserId) -> Result<bool, AppError>;

    /// Every user in a company, oldest first.
    async fn list_by_company(&self, company_id: &CompanyId) -> Result<Vec<User>, AppError>;

    /// First `admin` of the given department.
    async fn find_department_admin(
        &self,
        company_id: &CompanyId,
        department: &str,
    ) -> Result<Option<User>, AppError>;

    /// First `superadmin` of the company.
    async fn find_super_admin(&self, company_id: &CompanyId) -> Result<Option<User>, AppError>;

    /// Stamp the user's last explicit login; returns whether the user exists.
    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let query = format!(
            "INSERT INTO users ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {}",
            USER_COLUMNS, USER_COLUMNS
        );
        let row = sqlx::query_as::<_, User>(&query)
            .bind(&user.id)
            .bind(&user.company_id)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(user.role)
            .bind(&user.department)
            .bind(&user.job_title)
            .bind(user.leave_balance.annual)
            .bind(user.leave_balance.sick)
            .bind(user.leave_balance.personal)
            .bind(user.leave_balance.emergency)
            .bind(user.last_login_at)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("User already registered".into())
                }
                other => other.into(),
            })?;
        Ok(row)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let query = format!(
            "UPDATE users SET full_name = $2, role = $3, department = $4, job_title = $5, \
             updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&user.id)
            .bind(&user.full_name)
            .bind(user.role)
            .bind(&user.department)
            .bind(&user.job_title)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn delete(&self, id: &UserId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_company(&self, company_id: &CompanyId) -> Result<Vec<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users WHERE company_id = $1 ORDER BY created_at ASC, id ASC",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn find_department_admin(
        &self,
        company_id: &CompanyId,
        department: &str,
    ) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users \
             WHERE company_id = $1 AND role = 'admin' AND department = $2 \
             ORDER BY created_at ASC, id ASC LIMIT 1",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(company_id)
            .bind(department)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_super_admin(&self, company_id: &CompanyId) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT {} FROM users \
             WHERE company_id = $1 AND role = 'superadmin' \
             ORDER BY created_at ASC, id ASC LIMIT 1",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
