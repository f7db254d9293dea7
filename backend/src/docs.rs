#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::models::{
    admin_request::{AdminRequestResponse, AdminRequestStatus},
    company::{CompanyResponse, CompanySettings, UpdateCompanySettings, VerifyCompanyCodePayload},
    notification::{Notification, NotificationKind},
    request::{
        CreateLeaveRequestPayload, CreateRequestPayload, LeavePayload, LeaveResponse,
        RequestResponse, RequestStatus, RequestType, StatusFilterPayload, UpdateStatusPayload,
    },
    user::{
        LeaveBalance, PromoteToAdminPayload, RegisterPayload, UpdateProfilePayload,
        UpdateRolePayload, UserResponse, UserRole,
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_doc,
        verify_company_code_doc,
        register_doc,
        user_data_doc,
        create_request_doc,
        list_requests_doc,
        update_request_status_doc,
        delete_request_doc,
        clear_history_doc,
        bulk_delete_doc,
        unassigned_requests_doc,
        create_leave_request_doc,
        list_leave_requests_doc,
        approve_leave_request_doc,
        reject_leave_request_doc,
        get_company_settings_doc,
        update_company_settings_doc,
        company_users_doc,
        request_admin_doc,
        list_admin_requests_doc,
        approve_admin_request_doc,
        reject_admin_request_doc,
        get_user_doc,
        update_role_doc,
        update_profile_doc,
        record_login_doc,
        notifications_doc,
        delete_user_doc,
        promote_to_admin_doc
    ),
    components(
        schemas(
            // users & auth
            RegisterPayload,
            UserResponse,
            UserRole,
            LeaveBalance,
            UpdateRolePayload,
            UpdateProfilePayload,
            PromoteToAdminPayload,
            Notification,
            NotificationKind,
            // requests
            CreateRequestPayload,
            CreateLeaveRequestPayload,
            LeavePayload,
            LeaveResponse,
            RequestResponse,
            RequestStatus,
            RequestType,
            UpdateStatusPayload,
            StatusFilterPayload,
            // company
            CompanyResponse,
            CompanySettings,
            UpdateCompanySettings,
            VerifyCompanyCodePayload,
            // admin requests
            AdminRequestResponse,
            AdminRequestStatus
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Registration and session profile"),
        (name = "Requests", description = "Office requests, routing and approval"),
        (name = "Leave", description = "Leave-only adapter endpoints"),
        (name = "Company", description = "Company settings and members"),
        (name = "Admin", description = "Admin requests and user management")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());
        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = serde_json::Value)),
    tag = "Auth",
    security(())
)]
fn health_doc() {}

#[utoipa::path(
    post,
    path = "/api/verify-company-code",
    request_body = VerifyCompanyCodePayload,
    responses(
        (status = 200, description = "Company name and departments", body = serde_json::Value),
        (status = 400, description = "Missing code"),
        (status = 404, description = "Unknown code")
    ),
    tag = "Auth",
    security(())
)]
fn verify_company_code_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Registered", body = serde_json::Value),
        (status = 409, description = "Already registered")
    ),
    tag = "Auth"
)]
fn register_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/user-data",
    responses((status = 200, description = "Current user", body = serde_json::Value)),
    tag = "Auth"
)]
fn user_data_doc() {}

#[utoipa::path(
    post,
    path = "/api/requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Stored and routed", body = serde_json::Value),
        (status = 400, description = "Validation failed")
    ),
    tag = "Requests"
)]
fn create_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/requests",
    responses((status = 200, description = "Role-scoped list, newest first", body = serde_json::Value)),
    tag = "Requests"
)]
fn list_requests_doc() {}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/status",
    params(("id" = String, Path, description = "Request id")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status changed", body = serde_json::Value),
        (status = 400, description = "Invalid status or request not pending"),
        (status = 403, description = "Wrong company or not assigned"),
        (status = 404, description = "Request not found")
    ),
    tag = "Requests"
)]
fn update_request_status_doc() {}

#[utoipa::path(
    delete,
    path = "/api/requests/{id}",
    params(("id" = String, Path, description = "Request id")),
    responses((status = 200, description = "Soft-deleted", body = serde_json::Value)),
    tag = "Requests"
)]
fn delete_request_doc() {}

#[utoipa::path(
    post,
    path = "/api/requests/clear-history",
    request_body = StatusFilterPayload,
    responses((status = 200, description = "Own requests in status removed", body = serde_json::Value)),
    tag = "Requests"
)]
fn clear_history_doc() {}

#[utoipa::path(
    delete,
    path = "/api/requests/bulk-delete",
    request_body = StatusFilterPayload,
    responses((status = 200, description = "Own requests in status removed", body = serde_json::Value)),
    tag = "Requests"
)]
fn bulk_delete_doc() {}

#[utoipa::path(
    get,
    path = "/api/requests/unassigned",
    responses((status = 200, description = "Pending requests for the super-admin", body = serde_json::Value)),
    tag = "Requests"
)]
fn unassigned_requests_doc() {}

#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = CreateLeaveRequestPayload,
    responses((status = 201, description = "Leave request stored", body = serde_json::Value)),
    tag = "Leave"
)]
fn create_leave_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/leave-requests",
    responses((status = 200, description = "Role-scoped leave requests", body = serde_json::Value)),
    tag = "Leave"
)]
fn list_leave_requests_doc() {}

#[utoipa::path(
    post,
    path = "/api/leave-requests/{id}/approve",
    params(("id" = String, Path, description = "Request id")),
    responses((status = 200, description = "Completed, balance debited", body = serde_json::Value)),
    tag = "Leave"
)]
fn approve_leave_request_doc() {}

#[utoipa::path(
    post,
    path = "/api/leave-requests/{id}/reject",
    params(("id" = String, Path, description = "Request id")),
    responses((status = 200, description = "Rejected", body = serde_json::Value)),
    tag = "Leave"
)]
fn reject_leave_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/company/settings",
    responses((status = 200, description = "Company and settings", body = serde_json::Value)),
    tag = "Company"
)]
fn get_company_settings_doc() {}

#[utoipa::path(
    put,
    path = "/api/company/settings",
    request_body = UpdateCompanySettings,
    responses((status = 200, description = "Settings updated", body = serde_json::Value)),
    tag = "Company"
)]
fn update_company_settings_doc() {}

#[utoipa::path(
    get,
    path = "/api/company/users",
    responses((status = 200, description = "Members of the company", body = serde_json::Value)),
    tag = "Company"
)]
fn company_users_doc() {}

#[utoipa::path(
    post,
    path = "/api/request-admin",
    responses(
        (status = 201, description = "Admin request submitted", body = serde_json::Value),
        (status = 400, description = "Already pending or already admin")
    ),
    tag = "Admin"
)]
fn request_admin_doc() {}

#[utoipa::path(
    get,
    path = "/api/admin-requests",
    responses((status = 200, description = "Pending admin requests", body = serde_json::Value)),
    tag = "Admin"
)]
fn list_admin_requests_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin-requests/{id}/approve",
    params(("id" = String, Path, description = "Admin request id")),
    responses((status = 200, description = "Requester promoted", body = serde_json::Value)),
    tag = "Admin"
)]
fn approve_admin_request_doc() {}

#[utoipa::path(
    post,
    path = "/api/admin-requests/{id}/reject",
    params(("id" = String, Path, description = "Admin request id")),
    responses((status = 200, description = "Rejected", body = serde_json::Value)),
    tag = "Admin"
)]
fn reject_admin_request_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, description = "User profile", body = serde_json::Value)),
    tag = "Admin"
)]
fn get_user_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateRolePayload,
    responses((status = 200, description = "Role updated", body = serde_json::Value)),
    tag = "Admin"
)]
fn update_role_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}/profile",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateProfilePayload,
    responses((status = 200, description = "Profile updated", body = serde_json::Value)),
    tag = "Admin"
)]
fn update_profile_doc() {}

#[utoipa::path(
    post,
    path = "/api/users/{id}/login",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, description = "Login time recorded", body = serde_json::Value)),
    tag = "Auth"
)]
fn record_login_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/{id}/notifications",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, description = "Decisions since last login", body = serde_json::Value)),
    tag = "Auth"
)]
fn notifications_doc() {}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = serde_json::Value),
        (status = 403, description = "Target is a super admin")
    ),
    tag = "Admin"
)]
fn delete_user_doc() {}

#[utoipa::path(
    post,
    path = "/api/promote-to-admin",
    request_body = PromoteToAdminPayload,
    responses((status = 200, description = "User promoted", body = serde_json::Value)),
    tag = "Admin"
)]
fn promote_to_admin_doc() {}
