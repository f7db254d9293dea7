use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    models::user::User,
    types::{AdminRequestId, CompanyId, UserId},
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema, Default,
)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdminRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl AdminRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRequestStatus::Pending => "pending",
            AdminRequestStatus::Approved => "approved",
            AdminRequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
/// A user's request to be granted the admin role.
pub struct AdminRequest {
    pub id: AdminRequestId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub company_id: CompanyId,
    pub status: AdminRequestStatus,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
}

impl AdminRequest {
    pub fn new(requester: &User) -> Self {
        Self {
            id: AdminRequestId::new(),
            user_id: requester.id.clone(),
            user_name: requester.full_name.clone(),
            user_email: requester.email.clone(),
            company_id: requester.company_id.clone(),
            status: AdminRequestStatus::Pending,
            created_at: Utc::now(),
            approved_at: None,
            rejected_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AdminRequestStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminRequestResponse {
    pub id: AdminRequestId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub company_id: CompanyId,
    pub status: AdminRequestStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl From<AdminRequest> for AdminRequestResponse {
    fn from(request: AdminRequest) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            user_name: request.user_name,
            user_email: request.user_email,
            company_id: request.company_id,
            status: request.status,
            created_at: request.created_at,
            approved_at: request.approved_at,
            rejected_at: request.rejected_at,
        }
    }
}
