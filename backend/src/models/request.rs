//! Office requests: one entity for general and leave requests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::user::User,
    types::{CompanyId, RequestId, UserId},
};

pub const DEFAULT_PRIORITY: &str = "Medium";
pub const LEGACY_LEAVE_PRIORITY: &str = "Normal";
pub const UNKNOWN_DEPARTMENT: &str = "Unknown";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[sqlx(type_name = "TEXT")]
/// Workflow status of a request.
pub enum RequestStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    /// Older clients and the leave surface call this state `Approved`.
    #[serde(alias = "Approved")]
    Completed,
    Rejected,
    /// Soft-deleted; hidden from every listing.
    #[serde(rename = "DELETED")]
    #[sqlx(rename = "DELETED")]
    Deleted,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::InProgress,
        RequestStatus::Completed,
        RequestStatus::Rejected,
        RequestStatus::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Completed => "Completed",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Deleted => "DELETED",
        }
    }

    /// Parses the wire value, accepting `Approved` for `Completed`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "Approved" {
            return Some(RequestStatus::Completed);
        }
        Self::ALL.into_iter().find(|status| status.as_str() == raw)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub enum RequestType {
    #[default]
    General,
    Leave,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::General => "General",
            RequestType::Leave => "Leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDetails {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count, computed at submission.
    pub days: i32,
    /// Free-form tag; mapped onto a balance bucket only when deducting.
    pub leave_type: String,
    pub deduct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    General,
    Leave(LeaveDetails),
}

impl RequestKind {
    pub fn request_type(&self) -> RequestType {
        match self {
            RequestKind::General => RequestType::General,
            RequestKind::Leave(_) => RequestType::Leave,
        }
    }

    pub fn leave(&self) -> Option<&LeaveDetails> {
        match self {
            RequestKind::General => None,
            RequestKind::Leave(details) => Some(details),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub id: RequestId,
    pub user_id: UserId,
    // Snapshot of the owner at submission time; never re-synced.
    pub user_name: String,
    pub user_email: String,
    pub user_department: String,
    pub company_id: CompanyId,
    pub category: String,
    pub kind: RequestKind,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: RequestStatus,
    /// `None` only when no admin could be found at submission.
    pub assigned_to: Option<UserId>,
    pub admin_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Submission data after validation, before routing.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub category: String,
    pub kind: RequestKind,
    pub title: String,
    pub description: String,
    pub priority: String,
}

impl Request {
    pub fn new(owner: &User, draft: NewRequest, assigned_to: Option<UserId>) -> Self {
        let now = Utc::now();
        Self {
            id: RequestId::new(),
            user_id: owner.id.clone(),
            user_name: owner.full_name.clone(),
            user_email: owner.email.clone(),
            user_department: owner
                .department
                .clone()
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string()),
            company_id: owner.company_id.clone(),
            category: draft.category,
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            status: RequestStatus::Pending,
            assigned_to,
            admin_comments: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
            rejected_at: None,
            started_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    pub fn is_deleted(&self) -> bool {
        self.status == RequestStatus::Deleted
    }

    pub fn is_leave(&self) -> bool {
        matches!(self.kind, RequestKind::Leave(_))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RequestRow {
    pub id: RequestId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub user_department: String,
    pub company_id: CompanyId,
    pub category: String,
    pub request_type: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: RequestStatus,
    pub assigned_to: Option<UserId>,
    pub admin_comments: Option<String>,
    pub leave_start: Option<NaiveDate>,
    pub leave_end: Option<NaiveDate>,
    pub leave_days: Option<i32>,
    pub leave_type: Option<String>,
    pub deduct: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
}

impl TryFrom<RequestRow> for Request {
    type Error = anyhow::Error;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let kind = match row.request_type.as_str() {
            "Leave" => {
                let (Some(start_date), Some(end_date)) = (row.leave_start, row.leave_end) else {
                    anyhow::bail!("leave request {} has no leave dates", row.id);
                };
                RequestKind::Leave(LeaveDetails {
                    start_date,
                    end_date,
                    days: row.leave_days.unwrap_or(0),
                    leave_type: row.leave_type.unwrap_or_default(),
                    deduct: row.deduct,
                })
            }
            _ => RequestKind::General,
        };

        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            user_email: row.user_email,
            user_department: row.user_department,
            company_id: row.company_id,
            category: row.category,
            kind,
            title: row.title,
            description: row.description,
            priority: row.priority,
            status: row.status,
            assigned_to: row.assigned_to,
            admin_comments: row.admin_comments,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
            rejected_at: row.rejected_at,
            started_at: row.started_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveResponse {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i32,
    pub leave_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Request as returned by the API.
pub struct RequestResponse {
    pub id: RequestId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub user_department: String,
    pub company_id: CompanyId,
    pub category: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: RequestStatus,
    pub assigned_to: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave: Option<LeaveResponse>,
    pub deduct: bool,
    pub date_submitted: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
}

impl From<Request> for RequestResponse {
    fn from(request: Request) -> Self {
        let request_type = request.kind.request_type();
        let (leave, deduct) = match request.kind {
            RequestKind::General => (None, false),
            RequestKind::Leave(details) => (
                Some(LeaveResponse {
                    start: details.start_date,
                    end: details.end_date,
                    days: details.days,
                    leave_type: details.leave_type,
                }),
                details.deduct,
            ),
        };
        Self {
            id: request.id,
            user_id: request.user_id,
            user_name: request.user_name,
            user_email: request.user_email,
            user_department: request.user_department,
            company_id: request.company_id,
            category: request.category,
            request_type,
            title: request.title,
            description: request.description,
            priority: request.priority,
            status: request.status,
            assigned_to: request.assigned_to,
            admin_comments: request.admin_comments,
            leave,
            deduct,
            date_submitted: request.created_at,
            last_updated: request.updated_at,
            completed_at: request.completed_at,
            rejected_at: request.rejected_at,
            started_at: request.started_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Leave window supplied by the submitter. A client-side `days` value is
/// accepted but ignored; the server recomputes it.
pub struct LeavePayload {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestPayload {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub priority: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<RequestType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave: Option<LeavePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduct: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Body of the leave-only submission endpoint.
pub struct CreateLeaveRequestPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 20))]
    pub priority: Option<String>,
    pub leave: LeavePayload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduct: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    /// One of `Pending`, `In Progress`, `Completed`, `Rejected`, `DELETED`.
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusFilterPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{LeaveBalance, UserRole};

    fn owner(department: Option<&str>) -> User {
        User::new(
            UserId::from("u-1"),
            CompanyId::from("c-1"),
            "jane@example.com".into(),
            "Jane Doe".into(),
            UserRole::User,
            department.map(str::to_string),
            None,
            LeaveBalance::default(),
        )
    }

    #[test]
    fn status_wire_values_match_workflow_names() {
        assert_eq!(
            serde_json::to_value(RequestStatus::InProgress).unwrap(),
            serde_json::json!("In Progress")
        );
        assert_eq!(
            serde_json::to_value(RequestStatus::Deleted).unwrap(),
            serde_json::json!("DELETED")
        );
        let legacy: RequestStatus = serde_json::from_str("\"Approved\"").unwrap();
        assert_eq!(legacy, RequestStatus::Completed);
    }

    #[test]
    fn status_parse_accepts_known_values_only() {
        assert_eq!(RequestStatus::parse("In Progress"), Some(RequestStatus::InProgress));
        assert_eq!(RequestStatus::parse("Approved"), Some(RequestStatus::Completed));
        assert_eq!(RequestStatus::parse("DELETED"), Some(RequestStatus::Deleted));
        assert_eq!(RequestStatus::parse("completed"), None);
        assert_eq!(RequestStatus::parse("Archived"), None);
    }

    #[test]
    fn new_request_snapshots_owner_and_starts_pending() {
        let request = Request::new(
            &owner(None),
            NewRequest {
                category: "IT".into(),
                kind: RequestKind::General,
                title: "Laptop".into(),
                description: "Screen broken".into(),
                priority: DEFAULT_PRIORITY.into(),
            },
            None,
        );
        assert!(request.is_pending());
        assert_eq!(request.user_name, "Jane Doe");
        assert_eq!(request.user_department, UNKNOWN_DEPARTMENT);
        assert_eq!(request.created_at, request.updated_at);
    }

    #[test]
    fn response_flattens_leave_details() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let request = Request::new(
            &owner(Some("Sales")),
            NewRequest {
                category: "HR".into(),
                kind: RequestKind::Leave(LeaveDetails {
                    start_date: start,
                    end_date: end,
                    days: 5,
                    leave_type: "annual".into(),
                    deduct: true,
                }),
                title: "Holiday".into(),
                description: "Trip".into(),
                priority: DEFAULT_PRIORITY.into(),
            },
            Some(UserId::from("admin-1")),
        );

        let json = serde_json::to_value(RequestResponse::from(request)).unwrap();
        assert_eq!(json["type"], "Leave");
        assert_eq!(json["leave"]["days"], 5);
        assert_eq!(json["leave"]["leaveType"], "annual");
        assert_eq!(json["leave"]["start"], "2024-01-01");
        assert_eq!(json["deduct"], true);
        assert_eq!(json["assignedTo"], "admin-1");
        assert_eq!(json["userDepartment"], "Sales");
        assert_eq!(json["status"], "Pending");
    }

    #[test]
    fn leave_row_without_dates_is_rejected() {
        let now = Utc::now();
        let row = RequestRow {
            id: RequestId::from("r-1"),
            user_id: UserId::from("u-1"),
            user_name: "Jane".into(),
            user_email: "jane@example.com".into(),
            user_department: "HR".into(),
            company_id: CompanyId::from("c-1"),
            category: "HR".into(),
            request_type: "Leave".into(),
            title: "t".into(),
            description: "d".into(),
            priority: DEFAULT_PRIORITY.into(),
            status: RequestStatus::Pending,
            assigned_to: None,
            admin_comments: None,
            leave_start: None,
            leave_end: None,
            leave_days: None,
            leave_type: None,
            deduct: false,
            created_at: now,
            updated_at: now,
            completed_at: None,
            rejected_at: None,
            started_at: None,
        };
        assert!(Request::try_from(row.clone()).is_err());

        let general = RequestRow {
            request_type: "General".into(),
            ..row
        };
        let request = Request::try_from(general).unwrap();
        assert_eq!(request.kind, RequestKind::General);
    }
}
