//! Admin router: picks the admin responsible for a new request.
//!
//! Category maps onto a department; the department's first admin (earliest
//! created, ties broken by id) wins. Without one the company's first
//! super-admin takes the request. If neither exists the request is stored
//! unrouted. Routing never fails a submission: store errors are logged and
//! treated as "unrouted".

use crate::{
    models::user::User,
    repositories::UserRepository,
    types::{CompanyId, UserId},
};

/// Department responsible for a request category. Matching is exact.
pub fn department_for_category(category: &str) -> Option<&'static str> {
    match category {
        "HR" => Some("HR"),
        "IT" => Some("IT"),
        "Maintenance" => Some("Maintenance"),
        "Leave" => Some("HR"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    DepartmentAdmin { admin_id: UserId, department: String },
    SuperAdminFallback { admin_id: UserId },
    Unrouted,
}

impl RouteOutcome {
    /// Value stored in the request's `assigned_to`.
    pub fn assigned_to(&self) -> Option<UserId> {
        match self {
            RouteOutcome::DepartmentAdmin { admin_id, .. }
            | RouteOutcome::SuperAdminFallback { admin_id } => Some(admin_id.clone()),
            RouteOutcome::Unrouted => None,
        }
    }

    /// Submission message shown to the requester.
    pub fn message(&self) -> String {
        match self {
            RouteOutcome::DepartmentAdmin { department, .. } => {
                format!("Request submitted and routed to {} department admin", department)
            }
            RouteOutcome::SuperAdminFallback { .. } => {
                "Request submitted and routed to Super Admin (no department admin available)"
                    .to_string()
            }
            RouteOutcome::Unrouted => "Request submitted successfully".to_string(),
        }
    }
}

/// Routes a request of `category` within `company_id`. Reads only.
pub async fn route_request(
    users: &dyn UserRepository,
    category: &str,
    company_id: &CompanyId,
) -> RouteOutcome {
    if let Some(department) = department_for_category(category) {
        match users.find_department_admin(company_id, department).await {
            Ok(Some(admin)) => {
                tracing::debug!(
                    %category,
                    %department,
                    admin_id = %admin.id,
                    "routed to department admin"
                );
                return department_outcome(admin, department);
            }
            Ok(None) => tracing::debug!(%category, %department, "no department admin"),
            Err(err) => {
                tracing::warn!(%category, error = %err, "department admin lookup failed");
                return RouteOutcome::Unrouted;
            }
        }
    }

    match users.find_super_admin(company_id).await {
        Ok(Some(super_admin)) => {
            tracing::debug!(%category, admin_id = %super_admin.id, "routed to super admin");
            RouteOutcome::SuperAdminFallback {
                admin_id: super_admin.id,
            }
        }
        Ok(None) => {
            tracing::warn!(%category, company_id = %company_id, "no admin available; request unrouted");
            RouteOutcome::Unrouted
        }
        Err(err) => {
            tracing::warn!(%category, error = %err, "super admin lookup failed");
            RouteOutcome::Unrouted
        }
    }
}

fn department_outcome(admin: User, department: &str) -> RouteOutcome {
    RouteOutcome::DepartmentAdmin {
        admin_id: admin.id,
        department: admin
            .department
            .unwrap_or_else(|| department.to_string()),
    }
}
