//! Models that represent users, their roles and leave balances.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{CompanyId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
/// Stored user profile; the id is the identity provider's uid.
pub struct User {
    pub id: UserId,
    pub company_id: CompanyId,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    /// Department the user belongs to; admins are authoritative for it.
    pub department: Option<String>,
    pub job_title: Option<String>,
    #[sqlx(flatten)]
    pub leave_balance: LeaveBalance,
    /// Last explicit login, used to compute notifications.
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UserId,
        company_id: CompanyId,
        email: String,
        full_name: String,
        role: UserRole,
        department: Option<String>,
        job_title: Option<String>,
        leave_balance: LeaveBalance,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            company_id,
            email,
            full_name,
            role,
            department,
            job_title,
            leave_balance,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin)
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self.role, UserRole::SuperAdmin)
    }

    /// Admin or super-admin.
    pub fn has_admin_rights(&self) -> bool {
        self.is_admin() || self.is_super_admin()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
/// Supported user roles stored in the database.
pub enum UserRole {
    /// Regular employee submitting requests.
    #[default]
    User,
    /// Department admin handling requests routed to their department.
    Admin,
    /// Company-wide authority and routing fallback.
    SuperAdmin,
}

impl UserRole {
    /// Returns the canonical lowercase representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::SuperAdmin => "superadmin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "superadmin" => Ok(UserRole::SuperAdmin),
            other => Err(format!(
                "Invalid role '{}'. Must be user, admin, or superadmin",
                other
            )),
        }
    }
}

impl Serialize for UserRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(&s, &["user", "admin", "superadmin"])
        })
    }
}

/// The four leave counters kept on every user, in whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(default)]
pub struct LeaveBalance {
    #[sqlx(rename = "leave_annual")]
    pub annual: i32,
    #[sqlx(rename = "leave_sick")]
    pub sick: i32,
    #[sqlx(rename = "leave_personal")]
    pub personal: i32,
    #[sqlx(rename = "leave_emergency")]
    pub emergency: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// User profile as returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub company_id: CompanyId,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub leave_balance: LeaveBalance,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            company_id: user.company_id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            department: user.department,
            job_title: user.job_title,
            leave_balance: user.leave_balance,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Registration of a verified identity, either founding or joining a company.
pub struct RegisterPayload {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub full_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_creating_company: bool,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_code: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub department: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRolePayload {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub job_title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub department: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromoteToAdminPayload {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Job title given to department admins.
pub fn head_of_title(department: &str) -> String {
    format!("Head of {}", department)
}
