//! Turning a submission payload into a routed, stored request.

use crate::{
    error::AppError,
    models::{
        request::{
            CreateLeaveRequestPayload, CreateRequestPayload, LeaveDetails, LeavePayload,
            NewRequest, Request, RequestKind, RequestType, DEFAULT_PRIORITY,
            LEGACY_LEAVE_PRIORITY,
        },
        user::User,
    },
    repositories::{RequestRepository, UserRepository},
    services::{
        ledger::inclusive_days,
        routing::{self, RouteOutcome},
    },
};

/// Category the leave-only surface files its requests under.
pub const LEAVE_CATEGORY: &str = "HR";
/// Routing key for leave; resolves to the HR department.
pub const LEAVE_ROUTE: &str = "Leave";

fn leave_details(leave: LeavePayload, deduct: bool) -> Result<LeaveDetails, AppError> {
    let days = inclusive_days(leave.start, leave.end)
        .ok_or_else(|| AppError::BadRequest("Leave end date must not be before start date".into()))?;
    Ok(LeaveDetails {
        start_date: leave.start,
        end_date: leave.end,
        days,
        leave_type: leave
            .leave_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "annual".to_string()),
        deduct,
    })
}

fn priority_or(priority: Option<String>, default: &str) -> String {
    priority
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Validated draft from the general submission endpoint.
pub fn draft_from_payload(payload: CreateRequestPayload) -> Result<NewRequest, AppError> {
    let title = payload.title.trim().to_string();
    let description = payload.description.trim().to_string();
    let category = payload.category.trim().to_string();
    if title.is_empty() || description.is_empty() || category.is_empty() {
        return Err(AppError::BadRequest(
            "Title, description, and category are required".into(),
        ));
    }

    let kind = match payload.request_type.unwrap_or_default() {
        RequestType::General => RequestKind::General,
        RequestType::Leave => {
            let leave = payload.leave.ok_or_else(|| {
                AppError::BadRequest("Leave details are required for leave requests".into())
            })?;
            RequestKind::Leave(leave_details(leave, payload.deduct.unwrap_or(false))?)
        }
    };

    Ok(NewRequest {
        category,
        kind,
        title,
        description,
        priority: priority_or(payload.priority, DEFAULT_PRIORITY),
    })
}

/// Draft from the leave-only endpoint; always an HR leave request.
pub fn draft_from_leave_payload(payload: CreateLeaveRequestPayload) -> Result<NewRequest, AppError> {
    let details = leave_details(payload.leave, payload.deduct.unwrap_or(false))?;
    Ok(NewRequest {
        category: LEAVE_CATEGORY.to_string(),
        kind: RequestKind::Leave(details),
        title: payload
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Leave Request".to_string()),
        description: payload.description.unwrap_or_default().trim().to_string(),
        priority: priority_or(payload.priority, LEGACY_LEAVE_PRIORITY),
    })
}

/// Routes the draft by `route_key`, then stores it as a new `Pending` request.
pub async fn submit(
    users: &dyn UserRepository,
    requests: &dyn RequestRepository,
    owner: &User,
    draft: NewRequest,
    route_key: &str,
) -> Result<(Request, RouteOutcome), AppError> {
    let outcome = routing::route_request(users, route_key, &owner.company_id).await;
    let request = Request::new(owner, draft, outcome.assigned_to());
    let stored = requests.create(&request).await?;

    tracing::info!(
        request_id = %stored.id,
        user_id = %owner.id,
        category = %stored.category,
        assigned_to = ?stored.assigned_to,
        "request submitted"
    );
    Ok((stored, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn payload(request_type: Option<RequestType>, leave: Option<LeavePayload>) -> CreateRequestPayload {
        CreateRequestPayload {
            title: "  Time off ".into(),
            description: "Family trip".into(),
            category: "HR".into(),
            priority: None,
            request_type,
            leave,
            deduct: Some(true),
        }
    }

    fn window(start: (i32, u32, u32), end: (i32, u32, u32), leave_type: Option<&str>) -> LeavePayload {
        LeavePayload {
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            days: Some(99),
            leave_type: leave_type.map(str::to_string),
        }
    }

    #[test]
    fn leave_days_are_recomputed_inclusively() {
        let draft = draft_from_payload(payload(
            Some(RequestType::Leave),
            Some(window((2024, 1, 1), (2024, 1, 5), Some("annual"))),
        ))
        .unwrap();
        let leave = draft.kind.leave().unwrap();
        assert_eq!(leave.days, 5);
        assert!(leave.deduct);
        assert_eq!(draft.title, "Time off");
        assert_eq!(draft.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn reversed_leave_window_is_rejected() {
        let err = draft_from_payload(payload(
            Some(RequestType::Leave),
            Some(window((2024, 1, 5), (2024, 1, 1), None)),
        ))
        .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn leave_type_without_details_is_rejected() {
        assert!(draft_from_payload(payload(Some(RequestType::Leave), None)).is_err());
    }

    #[test]
    fn general_requests_ignore_leave_details() {
        let draft = draft_from_payload(payload(
            None,
            Some(window((2024, 1, 1), (2024, 1, 2), None)),
        ))
        .unwrap();
        assert_eq!(draft.kind, RequestKind::General);
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let mut p = payload(None, None);
        p.description = "   ".into();
        let err = draft_from_payload(p).unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(msg) if msg == "Title, description, and category are required")
        );
    }

    #[test]
    fn leave_endpoint_defaults_title_and_tag() {
        let draft = draft_from_leave_payload(CreateLeaveRequestPayload {
            title: None,
            description: None,
            priority: None,
            leave: window((2024, 2, 1), (2024, 2, 2), None),
            deduct: None,
        })
        .unwrap();
        assert_eq!(draft.category, LEAVE_CATEGORY);
        assert_eq!(draft.title, "Leave Request");
        assert_eq!(draft.priority, LEGACY_LEAVE_PRIORITY);
        let leave = draft.kind.leave().unwrap();
        assert_eq!(leave.leave_type, "annual");
        assert_eq!(leave.days, 2);
        assert!(!leave.deduct);
    }
}
