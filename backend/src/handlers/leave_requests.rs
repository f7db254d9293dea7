//! Leave-only endpoints kept for older clients. They are thin adapters over
//! the unified request entity.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::requests::scope_for,
    middleware::CurrentUser,
    models::request::{CreateLeaveRequestPayload, RequestResponse, RequestStatus},
    services::{lifecycle, submission},
    state::AppState,
    types::RequestId,
};

#[derive(Debug, Default, Deserialize)]
pub struct DecisionPayload {
    #[serde(default)]
    pub comments: Option<String>,
}

pub async fn create_leave_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<CreateLeaveRequestPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let draft = submission::draft_from_leave_payload(payload)?;

    let (request, outcome) = state
        .store(submission::submit(
            state.users.as_ref(),
            state.requests.as_ref(),
            &current.user,
            draft,
            submission::LEAVE_ROUTE,
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

pub async fn list_leave_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let requests = state.store(state.requests.list(&scope_for(&current.user))).await?;
    let requests: Vec<RequestResponse> = requests
        .into_iter()
        .filter(|r| r.is_leave())
        .map(RequestResponse::from)
        .collect();
    Ok(Json(json!({ "success": true, "requests": requests })))
}

async fn decide(
    state: &AppState,
    current: &CurrentUser,
    request_id: String,
    target: RequestStatus,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<Value>, AppError> {
    let request_id = RequestId::from(request_id);
    let existing = state
        .store(state.requests.find_by_id(&request_id))
        .await?
        .filter(|r| r.is_leave())
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;

    let comments = payload.and_then(|Json(p)| p.comments);
    let updated = state
        .store(lifecycle::transition(
            state.requests.as_ref(),
            &current.user,
            &existing.id,
            target,
            comments,
        ))
        .await?;
    Ok(Json(json!({
        "success": true,
        "request": RequestResponse::from(updated),
    })))
}

pub async fn approve_leave_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<String>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<Value>, AppError> {
    decide(&state, &current, request_id, RequestStatus::Completed, payload).await
}

pub async fn reject_leave_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<String>,
    payload: Option<Json<DecisionPayload>>,
) -> Result<Json<Value>, AppError> {
    decide(&state, &current, request_id, RequestStatus::Rejected, payload).await
}
