use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    middleware::CurrentUser,
    models::{
        company::{CompanyResponse, UpdateCompanySettings, VerifyCompanyCodePayload},
        user::UserResponse,
    },
    state::AppState,
    utils::normalize_company_code,
};

pub async fn get_settings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let company = state
        .store(state.companies.find_by_id(&current.user.company_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".into()))?;
    Ok(Json(json!({
        "success": true,
        "company": CompanyResponse::from(company),
    })))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<UpdateCompanySettings>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let company_id = &current.user.company_id;
    let mut company = state
        .store(state.companies.find_by_id(company_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".into()))?;
    company.settings.apply(payload);

    let updated = state
        .store(state.companies.update_settings(company_id, &company.settings))
        .await?;
    tracing::info!(company_id = %company_id, updated_by = %current.user.id, "company settings updated");

    Ok(Json(json!({
        "success": true,
        "message": "Company settings updated successfully",
        "company": CompanyResponse::from(updated),
    })))
}

pub async fn list_company_users(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let users = state
        .store(state.users.list_by_company(&current.user.company_id))
        .await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(json!({ "success": true, "users": users })))
}

/// Public lookup used by the sign-up form before an account exists.
pub async fn verify_company_code(
    State(state): State<AppState>,
    payload: Result<Json<VerifyCompanyCodePayload>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(payload) = payload?;
    let code = normalize_company_code(payload.company_code)?;

    let company = state
        .store(state.companies.find_by_code(&code))
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid company code".into()))?;

    Ok(Json(json!({
        "success": true,
        "companyName": company.name,
        "departments": company.settings.departments,
    })))
}
