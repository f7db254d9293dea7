use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    error::AppError,
    identity::VerifiedIdentity,
    models::user::User,
    state::AppState,
    types::UserId,
};

/// The verified caller together with their stored profile.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub identity: VerifiedIdentity,
}

const INVALID_TOKEN: &str = "Invalid or expired token";

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    (!token.is_empty()).then_some(token)
}

async fn verify_bearer(state: &AppState, headers: &HeaderMap) -> Result<VerifiedIdentity, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Access token required".into()))?;

    match tokio::time::timeout(state.identity_timeout(), state.identity.verify(token)).await {
        Ok(Ok(identity)) => Ok(identity),
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "token rejected");
            Err(AppError::Forbidden(INVALID_TOKEN.into()))
        }
        Err(_) => {
            tracing::warn!("identity verification timed out");
            Err(AppError::Forbidden(INVALID_TOKEN.into()))
        }
    }
}

/// Requires a valid token and a stored user; inserts [`CurrentUser`].
pub async fn auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = verify_bearer(&state, request.headers()).await?;
    let uid = UserId::from(identity.uid.as_str());
    let user = state
        .store(state.users.find_by_id(&uid))
        .await?
        .ok_or_else(|| AppError::Forbidden("User not found in database".into()))?;

    request
        .extensions_mut()
        .insert(CurrentUser { user, identity });
    Ok(next.run(request).await)
}

/// Requires a valid token only; inserts [`VerifiedIdentity`].
pub async fn verify_identity_only(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = verify_bearer(&state, request.headers()).await?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

fn current_user(request: &Request) -> Result<&CurrentUser, AppError> {
    request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Unauthorized("Access token required".into()))
}

// Must run inside `auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    if !current_user(&request)?.user.has_admin_rights() {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    Ok(next.run(request).await)
}

pub async fn require_super_admin(request: Request, next: Next) -> Result<Response, AppError> {
    if !current_user(&request)?.user.is_super_admin() {
        return Err(AppError::Forbidden("Super admin access required".into()));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(parse_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("BEARER   abc "), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(parse_bearer_token("Basic abc"), None);
        assert_eq!(parse_bearer_token("Bearer "), None);
        assert_eq!(parse_bearer_token("abc"), None);
    }
}
