//! Requests to become an admin: pending → approved | rejected, once.

use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        admin_request::{AdminRequest, AdminRequestStatus},
        user::{head_of_title, User, UserRole},
    },
    repositories::{AdminRequestRepository, CompanyRepository, UserRepository},
    types::AdminRequestId,
};

pub async fn submit(
    admin_requests: &dyn AdminRequestRepository,
    requester: &User,
) -> Result<AdminRequest, AppError> {
    if requester.has_admin_rights() {
        return Err(AppError::BadRequest("User is already an admin".into()));
    }
    if admin_requests
        .find_pending_for_user(&requester.id)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "You already have a pending request".into(),
        ));
    }
    admin_requests.create(&AdminRequest::new(requester)).await
}

async fn load_for_decision(
    admin_requests: &dyn AdminRequestRepository,
    actor: &User,
    id: &AdminRequestId,
) -> Result<AdminRequest, AppError> {
    let request = admin_requests
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Request not found".into()))?;
    if request.company_id != actor.company_id {
        return Err(AppError::Forbidden("Unauthorized".into()));
    }
    if !request.is_pending() {
        return Err(AppError::NotPending);
    }
    Ok(request)
}

/// Approves the request and makes its author an admin of the company's first
/// department, titled "Head of <Department>".
pub async fn approve(
    admin_requests: &dyn AdminRequestRepository,
    users: &dyn UserRepository,
    companies: &dyn CompanyRepository,
    actor: &User,
    id: &AdminRequestId,
) -> Result<User, AppError> {
    let request = load_for_decision(admin_requests, actor, id).await?;

    let mut user = users
        .find_by_id(&request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let company = companies
        .find_by_id(&actor.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".into()))?;

    admin_requests
        .decide(id, AdminRequestStatus::Approved, Utc::now())
        .await?;

    let department = company.default_department();
    user.role = UserRole::Admin;
    user.job_title = Some(head_of_title(&department));
    user.department = Some(department);
    let updated = users.update(&user).await?;

    tracing::info!(
        admin_request_id = %id,
        user_id = %updated.id,
        approved_by = %actor.id,
        "admin request approved"
    );
    Ok(updated)
}

pub async fn reject(
    admin_requests: &dyn AdminRequestRepository,
    actor: &User,
    id: &AdminRequestId,
) -> Result<AdminRequest, AppError> {
    load_for_decision(admin_requests, actor, id).await?;
    let decided = admin_requests
        .decide(id, AdminRequestStatus::Rejected, Utc::now())
        .await?;
    tracing::info!(admin_request_id = %id, rejected_by = %actor.id, "admin request rejected");
    Ok(decided)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{company::Company, user::LeaveBalance},
        repositories::{MockAdminRequestRepository, MockCompanyRepository, MockUserRepository},
        types::{CompanyId, UserId},
    };

    fn user(id: &str, company: &str, role: UserRole) -> User {
        User::new(
            UserId::from(id),
            CompanyId::from(company),
            format!("{id}@example.com"),
            id.to_string(),
            role,
            None,
            None,
            LeaveBalance::default(),
        )
    }

    #[tokio::test]
    async fn approval_promotes_to_first_department() {
        let requester = user("u1", "acme", UserRole::User);
        let pending = AdminRequest::new(&requester);
        let id = pending.id.clone();

        let mut admin_requests = MockAdminRequestRepository::new();
        let found = pending.clone();
        admin_requests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(found.clone())));
        admin_requests
            .expect_decide()
            .withf(|_, status, _| *status == AdminRequestStatus::Approved)
            .times(1)
            .returning(move |_, status, _| {
                let mut decided = pending.clone();
                decided.status = status;
                Ok(decided)
            });

        let mut users = MockUserRepository::new();
        let stored = requester.clone();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        users.expect_update().returning(|u| Ok(u.clone()));

        let mut companies = MockCompanyRepository::new();
        companies.expect_find_by_id().returning(|_| {
            let mut company = Company::new("Acme".into(), "ACME0001".into());
            company.settings.departments = vec!["Finance".into(), "IT".into()];
            Ok(Some(company))
        });

        let promoted = approve(
            &admin_requests,
            &users,
            &companies,
            &user("root", "acme", UserRole::SuperAdmin),
            &id,
        )
        .await
        .unwrap();
        assert_eq!(promoted.role, UserRole::Admin);
        assert_eq!(promoted.department.as_deref(), Some("Finance"));
        assert_eq!(promoted.job_title.as_deref(), Some("Head of Finance"));
    }

    #[tokio::test]
    async fn decided_requests_are_not_pending() {
        let mut decided = AdminRequest::new(&user("u1", "acme", UserRole::User));
        decided.status = AdminRequestStatus::Rejected;
        let id = decided.id.clone();

        let mut admin_requests = MockAdminRequestRepository::new();
        admin_requests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(decided.clone())));
        admin_requests.expect_decide().never();

        let err = reject(&admin_requests, &user("root", "acme", UserRole::SuperAdmin), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotPending));
    }

    #[tokio::test]
    async fn other_company_cannot_decide() {
        let pending = AdminRequest::new(&user("u1", "acme", UserRole::User));
        let id = pending.id.clone();
        let mut admin_requests = MockAdminRequestRepository::new();
        admin_requests
            .expect_find_by_id()
            .returning(move |_| Ok(Some(pending.clone())));

        let err = reject(&admin_requests, &user("root", "globex", UserRole::SuperAdmin), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn second_submission_is_refused() {
        let requester = user("u1", "acme", UserRole::User);
        let existing = AdminRequest::new(&requester);
        let mut admin_requests = MockAdminRequestRepository::new();
        admin_requests
            .expect_find_pending_for_user()
            .returning(move |_| Ok(Some(existing.clone())));
        admin_requests.expect_create().never();

        let err = submit(&admin_requests, &requester).await.unwrap_err();
        assert!(
            matches!(err, AppError::BadRequest(msg) if msg == "You already have a pending request")
        );
    }
}
