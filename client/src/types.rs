use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(alias = "Approved")]
    Completed,
    Rejected,
    #[serde(rename = "DELETED")]
    Deleted,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Deleted => "DELETED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestType {
    #[default]
    General,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRequestStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveBalance {
    pub annual: i32,
    pub sick: i32,
    pub personal: i32,
    pub emergency: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanySettings {
    pub departments: Vec<String>,
    pub annual_leave_balance: i32,
    pub sick_leave_balance: i32,
    pub personal_leave_balance: i32,
    pub emergency_leave_balance: i32,
    pub job_titles: BTreeMap<String, String>,
}

/// Partial settings update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departments: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_leave_balance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sick_leave_balance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_leave_balance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_leave_balance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_titles: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub company_code: String,
    pub settings: CompanySettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub company_id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub leave_balance: LeaveBalance,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<String>,
}

impl LeaveWindow {
    pub fn new(start: NaiveDate, end: NaiveDate, leave_type: impl Into<String>) -> Self {
        Self {
            start,
            end,
            days: None,
            leave_type: Some(leave_type.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub user_department: String,
    pub company_id: String,
    pub category: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: RequestStatus,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub admin_comments: Option<String>,
    #[serde(default)]
    pub leave: Option<LeaveWindow>,
    #[serde(default)]
    pub deduct: bool,
    pub date_submitted: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub request_type: Option<RequestType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave: Option<LeaveWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduct: Option<bool>,
}

impl NewRequest {
    pub fn general(
        category: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLeaveRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub leave: LeaveWindow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduct: Option<bool>,
}

impl From<LeaveWindow> for NewLeaveRequest {
    fn from(leave: LeaveWindow) -> Self {
        Self {
            title: None,
            description: None,
            priority: None,
            leave,
            deduct: None,
        }
    }
}

/// Sign-up body. Either creates a company or joins one by code.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub is_creating_company: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registered {
    pub message: String,
    pub company_code: String,
    pub user: User,
    pub company: Company,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user: User,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLookup {
    pub company_name: String,
    pub departments: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A created or updated request plus the server's human message.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestOutcome {
    #[serde(default)]
    pub message: Option<String>,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResult {
    pub message: String,
    pub deleted_count: u64,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequest {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub company_id: String,
    pub status: AdminRequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub category: String,
    pub status: RequestStatus,
    pub updated_at: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationFeed {
    pub count: usize,
    pub message: String,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleChange {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

/// Envelope pieces the client unwraps before handing values back.
#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Requests {
    pub requests: Vec<Request>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminRequests {
    pub requests: Vec<AdminRequest>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminRequestOutcome {
    pub request: AdminRequest,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Users {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompanyEnvelope {
    pub company: Company,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_status_accepts_legacy_approved() {
        let status: RequestStatus = serde_json::from_value(json!("Approved")).unwrap();
        assert_eq!(status, RequestStatus::Completed);
        assert_eq!(
            serde_json::to_value(RequestStatus::InProgress).unwrap(),
            json!("In Progress")
        );
    }

    #[test]
    fn new_request_omits_unset_fields() {
        let body = serde_json::to_value(NewRequest::general("IT", "Laptop", "Broken")).unwrap();
        assert_eq!(
            body,
            json!({ "title": "Laptop", "description": "Broken", "category": "IT" })
        );
    }
}
