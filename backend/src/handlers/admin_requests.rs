use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::CurrentUser,
    models::{admin_request::AdminRequestResponse, user::UserResponse},
    services::admin_requests,
    state::AppState,
    types::AdminRequestId,
};

pub async fn request_admin(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let created = state
        .store(admin_requests::submit(
            state.admin_requests.as_ref(),
            &current.user,
        ))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Admin request submitted successfully",
            "request": AdminRequestResponse::from(created),
        })),
    ))
}

pub async fn list_admin_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let pending = state
        .store(state.admin_requests.list_pending(&current.user.company_id))
        .await?;
    let requests: Vec<AdminRequestResponse> =
        pending.into_iter().map(AdminRequestResponse::from).collect();
    Ok(Json(json!({ "success": true, "requests": requests })))
}

pub async fn approve_admin_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let promoted = state
        .store(admin_requests::approve(
            state.admin_requests.as_ref(),
            state.users.as_ref(),
            state.companies.as_ref(),
            &current.user,
            &AdminRequestId::from(request_id),
        ))
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Admin request approved",
        "user": UserResponse::from(promoted),
    })))
}

pub async fn reject_admin_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let rejected = state
        .store(admin_requests::reject(
            state.admin_requests.as_ref(),
            &current.user,
            &AdminRequestId::from(request_id),
        ))
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Admin request rejected",
        "request": AdminRequestResponse::from(rejected),
    })))
}
