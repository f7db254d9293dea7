use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::CurrentUser,
    models::{
        request::{
            CreateRequestPayload, RequestResponse, RequestStatus, StatusFilterPayload,
            UpdateStatusPayload,
        },
        user::{User, UserRole},
    },
    repositories::RequestScope,
    services::{lifecycle, submission},
    state::AppState,
    types::RequestId,
};

/// What a caller may list: own requests, requests assigned to them, or the
/// whole company.
pub fn scope_for(user: &User) -> RequestScope {
    match user.role {
        UserRole::User => RequestScope::Owner(user.id.clone()),
        UserRole::Admin => RequestScope::Assignee {
            company_id: user.company_id.clone(),
            admin_id: user.id.clone(),
        },
        UserRole::SuperAdmin => RequestScope::Company(user.company_id.clone()),
    }
}

pub(crate) fn parse_status(raw: &str) -> Result<RequestStatus, AppError> {
    RequestStatus::parse(raw.trim()).ok_or_else(|| AppError::BadRequest("Invalid status".into()))
}

pub async fn create_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<CreateRequestPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(payload) = payload?;
    let route_key = payload.category.trim().to_string();
    let draft = submission::draft_from_payload(payload.clone())?;
    payload.validate()?;

    let (request, outcome) = state
        .store(submission::submit(
            state.users.as_ref(),
            state.requests.as_ref(),
            &current.user,
            draft,
            &route_key,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": outcome.message(),
            "request": RequestResponse::from(request),
        })),
    ))
}

pub async fn list_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let scope = scope_for(&current.user);
    let requests = state.store(state.requests.list(&scope)).await?;
    let requests: Vec<RequestResponse> = requests.into_iter().map(RequestResponse::from).collect();
    Ok(Json(json!({ "success": true, "requests": requests })))
}

pub async fn update_request_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<String>,
    payload: Result<Json<UpdateStatusPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    let status = parse_status(&payload.status)?;
    payload.validate()?;

    let updated = state
        .store(lifecycle::transition(
            state.requests.as_ref(),
            &current.user,
            &RequestId::from(request_id),
            status,
            payload.comments,
        ))
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Request {} successfully", status.as_str().to_lowercase()),
        "request": RequestResponse::from(updated),
    })))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let request_id = RequestId::from(request_id);
    state
        .store(lifecycle::soft_delete(
            state.requests.as_ref(),
            &current.user,
            &request_id,
        ))
        .await?;
    Ok(Json(json!({ "success": true, "message": "Request deleted successfully" })))
}

async fn purge(
    state: &AppState,
    current: &CurrentUser,
    payload: Result<Json<StatusFilterPayload>, JsonRejection>,
) -> Result<(u64, RequestStatus), AppError> {
    let Json(payload) = payload?;
    let raw = payload
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Status is required".into()))?;
    let status = parse_status(&raw)?;
    let deleted = state
        .store(lifecycle::purge_history(
            state.requests.as_ref(),
            &current.user.id,
            status,
        ))
        .await?;
    Ok((deleted, status))
}

fn request_noun(count: u64) -> &'static str {
    if count == 1 {
        "request"
    } else {
        "requests"
    }
}

pub async fn clear_history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<StatusFilterPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let (deleted, status) = purge(&state, &current, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Successfully cleared {} {} {} from your history",
            deleted,
            status.as_str().to_lowercase(),
            request_noun(deleted)
        ),
        "deletedCount": deleted,
        "status": status,
    })))
}

pub async fn bulk_delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<StatusFilterPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let (deleted, status) = purge(&state, &current, payload).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!(
            "Successfully deleted {} {} {}",
            deleted,
            status.as_str().to_lowercase(),
            request_noun(deleted)
        ),
        "deletedCount": deleted,
        "status": status,
    })))
}

/// Pending requests a super-admin should pick up: assigned to them or to
/// nobody.
pub async fn list_unassigned(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let requests = state
        .store(
            state
                .requests
                .list_unassigned(&current.user.company_id, &current.user.id),
        )
        .await?;
    let count = requests.len();
    let requests: Vec<RequestResponse> = requests.into_iter().map(RequestResponse::from).collect();
    Ok(Json(json!({
        "success": true,
        "message": format!("Found {} unassigned requests", count),
        "requests": requests,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::user::LeaveBalance, types::{CompanyId, UserId}};

    fn user(role: UserRole) -> User {
        User::new(
            UserId::from("me"),
            CompanyId::from("acme"),
            "me@example.com".into(),
            "Me".into(),
            role,
            None,
            None,
            LeaveBalance::default(),
        )
    }

    #[test]
    fn scope_follows_role() {
        assert_eq!(
            scope_for(&user(UserRole::User)),
            RequestScope::Owner(UserId::from("me"))
        );
        assert_eq!(
            scope_for(&user(UserRole::Admin)),
            RequestScope::Assignee {
                company_id: CompanyId::from("acme"),
                admin_id: UserId::from("me"),
            }
        );
        assert_eq!(
            scope_for(&user(UserRole::SuperAdmin)),
            RequestScope::Company(CompanyId::from("acme"))
        );
    }

    #[test]
    fn status_parsing_rejects_unknown_values() {
        assert_eq!(parse_status("In Progress").unwrap(), RequestStatus::InProgress);
        assert_eq!(parse_status("Approved").unwrap(), RequestStatus::Completed);
        assert!(matches!(parse_status("Done"), Err(AppError::BadRequest(msg)) if msg == "Invalid status"));
    }
}
