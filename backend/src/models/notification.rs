use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{models::request::RequestStatus, types::RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// A decided request the owner has not seen since their last login.
pub struct Notification {
    pub id: RequestId,
    pub title: String,
    pub category: String,
    pub status: RequestStatus,
    pub updated_at: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}
