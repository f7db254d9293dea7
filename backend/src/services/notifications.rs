//! Status-change notifications shown to a user after they log in.

use chrono::{DateTime, Utc};

use crate::models::{
    notification::{Notification, NotificationKind},
    request::{Request, RequestStatus},
};

pub const FIRST_LOGIN_MESSAGE: &str = "Welcome! This is your first login.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub message: String,
}

fn notification_for(request: &Request) -> Option<Notification> {
    let (message, kind) = match request.status {
        RequestStatus::Completed => (
            format!(
                "Your {} request \"{}\" has been approved!",
                request.category, request.title
            ),
            NotificationKind::Success,
        ),
        RequestStatus::Rejected => (
            format!(
                "Your {} request \"{}\" has been rejected.",
                request.category, request.title
            ),
            NotificationKind::Warning,
        ),
        _ => return None,
    };
    Some(Notification {
        id: request.id.clone(),
        title: request.title.clone(),
        category: request.category.clone(),
        status: request.status,
        updated_at: request.updated_at,
        message,
        kind,
    })
}

/// Decided requests updated after `last_login_at`, newest first.
pub fn feed(last_login_at: Option<DateTime<Utc>>, requests: &[Request]) -> NotificationFeed {
    let Some(last_login_at) = last_login_at else {
        return NotificationFeed {
            notifications: Vec::new(),
            message: FIRST_LOGIN_MESSAGE.to_string(),
        };
    };

    let mut notifications: Vec<Notification> = requests
        .iter()
        .filter(|r| r.updated_at > last_login_at)
        .filter_map(notification_for)
        .collect();
    notifications.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    let message = match notifications.len() {
        0 => "No new notifications".to_string(),
        1 => "You have 1 new notification".to_string(),
        n => format!("You have {} new notifications", n),
    };
    NotificationFeed {
        notifications,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        request::{NewRequest, RequestKind},
        user::{LeaveBalance, User, UserRole},
    };
    use crate::types::{CompanyId, UserId};
    use chrono::Duration;

    fn request(title: &str, status: RequestStatus, updated_at: DateTime<Utc>) -> Request {
        let owner = User::new(
            UserId::from("u1"),
            CompanyId::from("acme"),
            "u1@example.com".into(),
            "U1".into(),
            UserRole::User,
            None,
            None,
            LeaveBalance::default(),
        );
        let mut request = Request::new(
            &owner,
            NewRequest {
                category: "IT".into(),
                kind: RequestKind::General,
                title: title.into(),
                description: "d".into(),
                priority: "Medium".into(),
            },
            None,
        );
        request.status = status;
        request.updated_at = updated_at;
        request
    }

    #[test]
    fn first_login_has_no_notifications() {
        let feed = feed(None, &[request("x", RequestStatus::Completed, Utc::now())]);
        assert!(feed.notifications.is_empty());
        assert_eq!(feed.message, FIRST_LOGIN_MESSAGE);
    }

    #[test]
    fn only_decisions_after_last_login_are_reported_newest_first() {
        let login = Utc::now() - Duration::hours(1);
        let requests = vec![
            request("old", RequestStatus::Completed, login - Duration::minutes(5)),
            request("approved", RequestStatus::Completed, login + Duration::minutes(5)),
            request("rejected", RequestStatus::Rejected, login + Duration::minutes(10)),
            request("started", RequestStatus::InProgress, login + Duration::minutes(15)),
        ];

        let feed = feed(Some(login), &requests);
        assert_eq!(feed.notifications.len(), 2);
        assert_eq!(feed.notifications[0].title, "rejected");
        assert_eq!(feed.notifications[0].kind, NotificationKind::Warning);
        assert_eq!(
            feed.notifications[0].message,
            "Your IT request \"rejected\" has been rejected."
        );
        assert_eq!(
            feed.notifications[1].message,
            "Your IT request \"approved\" has been approved!"
        );
        assert_eq!(feed.message, "You have 2 new notifications");
    }
}
