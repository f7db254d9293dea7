//! Company (tenant) records and their settings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use validator::Validate;

use crate::{models::user::LeaveBalance, types::CompanyId};

pub const DEFAULT_DEPARTMENTS: [&str; 3] = ["HR", "IT", "Maintenance"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Public join token handed to employees at registration.
    pub company_code: String,
    pub settings: CompanySettings,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub fn new(name: String, company_code: String) -> Self {
        Self {
            id: CompanyId::new(),
            name,
            company_code,
            settings: CompanySettings::default(),
            created_at: Utc::now(),
        }
    }

    /// First configured department, used as the placeholder when an admin
    /// request is approved.
    pub fn default_department(&self) -> String {
        self.settings
            .departments
            .first()
            .cloned()
            .unwrap_or_else(|| "IT".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanySettings {
    /// Display order is the insertion order.
    pub departments: Vec<String>,
    pub annual_leave_balance: i32,
    pub sick_leave_balance: i32,
    pub personal_leave_balance: i32,
    pub emergency_leave_balance: i32,
    pub job_titles: BTreeMap<String, String>,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            departments: DEFAULT_DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
            annual_leave_balance: 20,
            sick_leave_balance: 10,
            personal_leave_balance: 0,
            emergency_leave_balance: 0,
            job_titles: BTreeMap::new(),
        }
    }
}

impl CompanySettings {
    /// Balances applied to a user joining the company.
    pub fn default_leave_balance(&self) -> LeaveBalance {
        LeaveBalance {
            annual: self.annual_leave_balance.max(0),
            sick: self.sick_leave_balance.max(0),
            personal: self.personal_leave_balance.max(0),
            emergency: self.emergency_leave_balance.max(0),
        }
    }

    pub fn has_department(&self, department: &str) -> bool {
        self.departments.iter().any(|d| d == department)
    }

    pub fn apply(&mut self, update: UpdateCompanySettings) {
        if let Some(departments) = update.departments {
            self.departments = departments;
        }
        if let Some(value) = update.annual_leave_balance {
            self.annual_leave_balance = value;
        }
        if let Some(value) = update.sick_leave_balance {
            self.sick_leave_balance = value;
        }
        if let Some(value) = update.personal_leave_balance {
            self.personal_leave_balance = value;
        }
        if let Some(value) = update.emergency_leave_balance {
            self.emergency_leave_balance = value;
        }
        if let Some(job_titles) = update.job_titles {
            self.job_titles = job_titles;
        }
    }
}

#[derive(Debug, FromRow)]
pub struct CompanyRow {
    pub id: CompanyId,
    pub name: String,
    pub company_code: String,
    pub settings: Json<CompanySettings>,
    pub created_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(row: CompanyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            company_code: row.company_code,
            settings: row.settings.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Partial update of company settings; absent fields are left unchanged.
pub struct UpdateCompanySettings {
    #[validate(custom(function = "crate::validation::rules::validate_departments"))]
    pub departments: Option<Vec<String>>,
    #[validate(range(min = 0, max = 366))]
    pub annual_leave_balance: Option<i32>,
    #[validate(range(min = 0, max = 366))]
    pub sick_leave_balance: Option<i32>,
    #[validate(range(min = 0, max = 366))]
    pub personal_leave_balance: Option<i32>,
    #[validate(range(min = 0, max = 366))]
    pub emergency_leave_balance: Option<i32>,
    pub job_titles: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: CompanyId,
    pub name: String,
    pub company_code: String,
    pub settings: CompanySettings,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            company_code: company.company_code,
            settings: company.settings,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCompanyCodePayload {
    #[serde(default)]
    pub company_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_policy() {
        let settings = CompanySettings::default();
        assert_eq!(settings.departments, vec!["HR", "IT", "Maintenance"]);
        assert_eq!(
            settings.default_leave_balance(),
            LeaveBalance {
                annual: 20,
                sick: 10,
                personal: 0,
                emergency: 0
            }
        );
    }

    #[test]
    fn partial_update_only_touches_given_fields() {
        let mut settings = CompanySettings::default();
        settings.apply(UpdateCompanySettings {
            sick_leave_balance: Some(12),
            departments: Some(vec!["Finance".into(), "HR".into()]),
            ..Default::default()
        });
        assert_eq!(settings.sick_leave_balance, 12);
        assert_eq!(settings.annual_leave_balance, 20);
        assert_eq!(settings.departments, vec!["Finance", "HR"]);
    }

    #[test]
    fn default_department_falls_back_when_list_is_empty() {
        let mut company = Company::new("Acme".into(), "ACME1234".into());
        assert_eq!(company.default_department(), "HR");
        company.settings.departments.clear();
        assert_eq!(company.default_department(), "IT");
    }

    #[test]
    fn stored_settings_without_fields_use_defaults() {
        let settings: CompanySettings =
            serde_json::from_str(r#"{"departments": ["Ops"]}"#).unwrap();
        assert_eq!(settings.departments, vec!["Ops"]);
        assert_eq!(settings.annual_leave_balance, 20);
    }
}
