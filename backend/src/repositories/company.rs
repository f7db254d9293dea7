use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::error::AppError;
use crate::models::company::{Company, CompanyRow, CompanySettings};
use crate::types::CompanyId;

const COMPANY_COLUMNS: &str = "id, name, company_code, settings, created_at";

/// Repository trait for companies (tenants).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, AppError>;

    /// Look up a company by its public join code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Company>, AppError>;

    /// Insert a company; a taken company code is a `Conflict`.
    async fn create(&self, company: &Company) -> Result<Company, AppError>;

    /// Replace the settings document of a company.
    async fn update_settings(
        &self,
        id: &CompanyId,
        settings: &CompanySettings,
    ) -> Result<Company, AppError>;
}

#[derive(Debug, Clone)]
pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, AppError> {
        let query = format!("SELECT {} FROM companies WHERE id = $1", COMPANY_COLUMNS);
        let row = sqlx::query_as::<_, CompanyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Company::from))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Company>, AppError> {
        let query = format!(
            "SELECT {} FROM companies WHERE company_code = $1",
            COMPANY_COLUMNS
        );
        let row = sqlx::query_as::<_, CompanyRow>(&query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Company::from))
    }

    async fn create(&self, company: &Company) -> Result<Company, AppError> {
        let query = format!(
            "INSERT INTO companies ({}) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            COMPANY_COLUMNS, COMPANY_COLUMNS
        );
        let row = sqlx::query_as::<_, CompanyRow>(&query)
            .bind(&company.id)
            .bind(&company.name)
            .bind(&company.company_code)
            .bind(Json(&company.settings))
            .bind(company.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AppError::Conflict("Company code already in use".into())
                }
                other => other.into(),
            })?;
        Ok(row.into())
    }

    async fn update_settings(
        &self,
        id: &CompanyId,
        settings: &CompanySettings,
    ) -> Result<Company, AppError> {
        let query = format!(
            "UPDATE companies SET settings = $2 WHERE id = $1 RETURNING {}",
            COMPANY_COLUMNS
        );
        sqlx::query_as::<_, CompanyRow>(&query)
            .bind(id)
            .bind(Json(settings))
            .fetch_optional(&self.pool)
            .await?
            .map(Company::from)
            .ok_or_else(|| AppError::NotFound("Company not found".into()))
    }
}
