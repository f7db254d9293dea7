use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::CurrentUser,
    models::user::{
        PromoteToAdminPayload, UpdateProfilePayload, UpdateRolePayload, User, UserResponse,
        UserRole,
    },
    repositories::RequestScope,
    services::{accounts, notifications},
    state::AppState,
    types::UserId,
};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

fn unauthorized() -> AppError {
    AppError::Forbidden("Unauthorized".into())
}

/// Loads a user of the caller's company; other tenants read as missing.
async fn load_member(state: &AppState, caller: &User, id: &UserId) -> Result<User, AppError> {
    state
        .store(state.users.find_by_id(id))
        .await?
        .filter(|u| u.company_id == caller.company_id)
        .ok_or_else(user_not_found)
}

pub async fn get_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let caller = &current.user;
    let user_id = UserId::from(user_id);
    if user_id != caller.id && !caller.has_admin_rights() {
        return Err(unauthorized());
    }
    let user = load_member(&state, caller, &user_id).await?;
    Ok(Json(json!({ "success": true, "user": UserResponse::from(user) })))
}

pub async fn update_role(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateRolePayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    let role: UserRole = payload.role.trim().parse().map_err(|_| {
        AppError::BadRequest("Invalid role. Must be user, admin, or superadmin".into())
    })?;
    payload.validate()?;

    let mut user = load_member(&state, &current.user, &UserId::from(user_id)).await?;
    accounts::change_role(&mut user, role, payload.department, payload.job_title)?;
    let user = state.store(state.users.update(&user)).await?;
    tracing::info!(user_id = %user.id, role = role.as_str(), changed_by = %current.user.id, "user role updated");

    Ok(Json(json!({
        "success": true,
        "message": "User role updated successfully",
        "user": UserResponse::from(user),
    })))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
    payload: Result<Json<UpdateProfilePayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let caller = &current.user;
    let user_id = UserId::from(user_id);
    if user_id != caller.id && !caller.is_super_admin() {
        return Err(unauthorized());
    }

    let mut user = load_member(&state, caller, &user_id).await?;
    accounts::update_profile(&mut user, payload);
    let user = state.store(state.users.update(&user)).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": UserResponse::from(user),
    })))
}

pub async fn record_login(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user_id = UserId::from(user_id);
    if user_id != current.user.id {
        return Err(unauthorized());
    }
    if !state.store(state.users.record_login(&user_id, Utc::now())).await? {
        return Err(user_not_found());
    }
    Ok(Json(json!({ "success": true, "message": "Login time updated" })))
}

pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user_id = UserId::from(user_id);
    if user_id != current.user.id {
        return Err(unauthorized());
    }

    let user = state
        .store(state.users.find_by_id(&user_id))
        .await?
        .ok_or_else(user_not_found)?;
    let requests = state
        .store(state.requests.list(&RequestScope::Owner(user_id)))
        .await?;

    let feed = notifications::feed(user.last_login_at, &requests);
    Ok(Json(json!({
        "success": true,
        "count": feed.notifications.len(),
        "message": feed.message,
        "notifications": feed.notifications,
    })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = load_member(&state, &current.user, &UserId::from(user_id)).await?;
    if user.is_super_admin() {
        return Err(AppError::Forbidden("Cannot delete super admin".into()));
    }
    if !state.store(state.users.delete(&user.id)).await? {
        return Err(user_not_found());
    }
    tracing::info!(user_id = %user.id, deleted_by = %current.user.id, "user deleted");
    Ok(Json(json!({ "success": true, "message": "User deleted successfully" })))
}

pub async fn promote_to_admin(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<PromoteToAdminPayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    let department = payload.department.map(|d| d.trim().to_string());
    let (Some(user_id), Some(department)) = (payload.user_id, department.filter(|d| !d.is_empty()))
    else {
        return Err(AppError::BadRequest("Missing required fields".into()));
    };

    let mut user = load_member(&state, &current.user, &user_id).await?;
    accounts::promote(&mut user, &department)?;
    let user = state.store(state.users.update(&user)).await?;
    tracing::info!(user_id = %user.id, %department, promoted_by = %current.user.id, "user promoted");

    let message = format!(
        "{} has been promoted to Admin ({})",
        user.full_name,
        user.job_title.as_deref().unwrap_or_default()
    );
    Ok(Json(json!({
        "success": true,
        "message": message,
        "user": UserResponse::from(user),
    })))
}
