use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    docs::ApiDoc,
    handlers,
    middleware::{auth, log_error_responses, request_id, require_admin, require_super_admin, verify_identity_only},
    state::AppState,
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(allowed)
    }
}

/// Builds the full HTTP surface over `state`.
pub fn build_router(state: AppState) -> Router {
    // No auth
    let public_routes = Router::new()
        .route("/health", get(handlers::auth::health))
        .route("/api/test", get(handlers::auth::api_test))
        .route(
            "/api/verify-company-code",
            post(handlers::company::verify_company_code),
        )
        .route("/register-form-api", post(handlers::auth::deprecated))
        .route("/login-form-api", post(handlers::auth::deprecated));

    // Verified token, stored profile not required yet
    let identity_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route_layer(from_fn_with_state(state.clone(), verify_identity_only));

    let user_routes = Router::new()
        .route("/api/auth/user-data", get(handlers::auth::user_data))
        .route(
            "/api/requests",
            get(handlers::requests::list_requests).post(handlers::requests::create_request),
        )
        .route(
            "/api/requests/clear-history",
            post(handlers::requests::clear_history),
        )
        .route(
            "/api/requests/bulk-delete",
            delete(handlers::requests::bulk_delete),
        )
        .route(
            "/api/requests/{id}",
            delete(handlers::requests::delete_request),
        )
        .route(
            "/api/leave-requests",
            get(handlers::leave_requests::list_leave_requests)
                .post(handlers::leave_requests::create_leave_request),
        )
        .route(
            "/api/company/settings",
            get(handlers::company::get_settings),
        )
        .route(
            "/api/request-admin",
            post(handlers::admin_requests::request_admin),
        )
        .route("/api/users/{id}", get(handlers::users::get_user))
        .route(
            "/api/users/{id}/profile",
            put(handlers::users::update_profile),
        )
        .route("/api/users/{id}/login", post(handlers::users::record_login))
        .route(
            "/api/users/{id}/notifications",
            get(handlers::users::get_notifications),
        )
        .route_layer(from_fn_with_state(state.clone(), auth));

    let admin_routes = Router::new()
        .route(
            "/api/requests/{id}/status",
            put(handlers::requests::update_request_status),
        )
        .route(
            "/api/leave-requests/{id}/approve",
            post(handlers::leave_requests::approve_leave_request),
        )
        .route(
            "/api/leave-requests/{id}/reject",
            post(handlers::leave_requests::reject_leave_request),
        )
        .route(
            "/api/company/users",
            get(handlers::company::list_company_users),
        )
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), auth));

    let super_admin_routes = Router::new()
        .route(
            "/api/requests/unassigned",
            get(handlers::requests::list_unassigned),
        )
        .route(
            "/api/company/settings",
            put(handlers::company::update_settings),
        )
        .route(
            "/api/admin-requests",
            get(handlers::admin_requests::list_admin_requests),
        )
        .route(
            "/api/admin-requests/{id}/approve",
            post(handlers::admin_requests::approve_admin_request),
        )
        .route(
            "/api/admin-requests/{id}/reject",
            post(handlers::admin_requests::reject_admin_request),
        )
        .route("/api/users/{id}/role", put(handlers::users::update_role))
        .route("/api/users/{id}", delete(handlers::users::delete_user))
        .route(
            "/api/promote-to-admin",
            post(handlers::users::promote_to_admin),
        )
        .route_layer(from_fn(require_super_admin))
        .route_layer(from_fn_with_state(state.clone(), auth));

    let request_timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config.cors_allow_origins);

    Router::new()
        .merge(public_routes)
        .merge(identity_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .merge(super_admin_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(log_error_responses))
                .layer(cors)
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(state)
}
