use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::AppError,
    identity::VerifiedIdentity,
    middleware::CurrentUser,
    models::{company::CompanyResponse, user::{RegisterPayload, UserResponse}},
    services::accounts,
    state::AppState,
};

pub const DEPRECATED_MESSAGE: &str =
    "This endpoint is deprecated. Please use the identity provider sign-in.";

pub async fn register(
    State(state): State<AppState>,
    Extension(identity): Extension<VerifiedIdentity>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let registration = state
        .store(accounts::register(
            state.users.as_ref(),
            state.companies.as_ref(),
            &identity,
            payload,
        ))
        .await?;

    let message = registration.message();
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": message,
            "companyCode": registration.company.company_code.clone(),
            "user": UserResponse::from(registration.user),
            "company": CompanyResponse::from(registration.company),
        })),
    ))
}

pub async fn user_data(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, AppError> {
    let company = state
        .store(state.companies.find_by_id(&current.user.company_id))
        .await?;
    Ok(Json(json!({
        "success": true,
        "user": UserResponse::from(current.user),
        "companyName": company.map(|c| c.name),
    })))
}

pub async fn deprecated() -> AppError {
    AppError::Gone(DEPRECATED_MESSAGE.into())
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Backend is running",
        "timestamp": Utc::now(),
    }))
}

pub async fn api_test() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "API is working",
        "timestamp": Utc::now(),
    }))
}
