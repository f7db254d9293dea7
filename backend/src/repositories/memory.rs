//! In-process store implementing every repository trait.
//!
//! Selected with `STORAGE_BACKEND=memory` and used by the API test-suite.
//! All mutations happen under one lock, which gives `apply_transition` the
//! same all-or-nothing behaviour as the Postgres transaction.

use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::{
    admin_request::{AdminRequest, AdminRequestStatus},
    company::{Company, CompanySettings},
    request::{Request, RequestStatus},
    user::{User, UserRole},
};
use crate::repositories::{
    AdminRequestRepository, CompanyRepository, RequestRepository, RequestScope, UserRepository,
};
use crate::services::{ledger, lifecycle::StatusTransition};
use crate::types::{AdminRequestId, CompanyId, RequestId, UserId};

#[derive(Debug, Default)]
struct Collections {
    companies: HashMap<CompanyId, Company>,
    users: HashMap<UserId, User>,
    requests: HashMap<RequestId, Request>,
    admin_requests: HashMap<AdminRequestId, AdminRequest>,
}

impl Collections {
    fn first_user(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users
            .values()
            .filter(|u| predicate(u))
            .min_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)))
            .cloned()
    }

    fn requests_where(&self, predicate: impl Fn(&Request) -> bool) -> Vec<Request> {
        let mut found: Vec<Request> = self
            .requests
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        found.sort_by_key(|r| Reverse((r.created_at, r.id.clone())));
        found
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AppError> {
        Ok(self.inner.lock().await.users.get(id).cloned())
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut store = self.inner.lock().await;
        if store.users.contains_key(&user.id) {
            return Err(AppError::Conflict("User already registered".into()));
        }
        store.users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut store = self.inner.lock().await;
        let existing = store
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        existing.full_name = user.full_name.clone();
        existing.role = user.role;
        existing.department = user.department.clone();
        existing.job_title = user.job_title.clone();
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, AppError> {
        Ok(self.inner.lock().await.users.remove(id).is_some())
    }

    async fn list_by_company(&self, company_id: &CompanyId) -> Result<Vec<User>, AppError> {
        let store = self.inner.lock().await;
        let mut users: Vec<User> = store
            .users
            .values()
            .filter(|u| &u.company_id == company_id)
            .cloned()
            .collect();
        users.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(users)
    }

    async fn find_department_admin(
        &self,
        company_id: &CompanyId,
        department: &str,
    ) -> Result<Option<User>, AppError> {
        let store = self.inner.lock().await;
        Ok(store.first_user(|u| {
            &u.company_id == company_id
                && u.role == UserRole::Admin
                && u.department.as_deref() == Some(department)
        }))
    }

    async fn find_super_admin(&self, company_id: &CompanyId) -> Result<Option<User>, AppError> {
        let store = self.inner.lock().await;
        Ok(store.first_user(|u| &u.company_id == company_id && u.role == UserRole::SuperAdmin))
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut store = self.inner.lock().await;
        match store.users.get_mut(id) {
            Some(user) => {
                user.last_login_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, AppError> {
        Ok(self.inner.lock().await.companies.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Company>, AppError> {
        let store = self.inner.lock().await;
        Ok(store
            .companies
            .values()
            .find(|c| c.company_code == code)
            .cloned())
    }

    async fn create(&self, company: &Company) -> Result<Company, AppError> {
        let mut store = self.inner.lock().await;
        if store
            .companies
            .values()
            .any(|c| c.company_code == company.company_code)
        {
            return Err(AppError::Conflict("Company code already in use".into()));
        }
        store.companies.insert(company.id.clone(), company.clone());
        Ok(company.clone())
    }

    async fn update_settings(
        &self,
        id: &CompanyId,
        settings: &CompanySettings,
    ) -> Result<Company, AppError> {
        let mut store = self.inner.lock().await;
        let company = store
            .companies
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Company not found".into()))?;
        company.settings = settings.clone();
        Ok(company.clone())
    }
}

#[async_trait]
impl RequestRepository for MemoryStore {
    async fn create(&self, request: &Request) -> Result<Request, AppError> {
        let mut store = self.inner.lock().await;
        store.requests.insert(request.id.clone(), request.clone());
        Ok(request.clone())
    }

    async fn find_by_id(&self, id: &RequestId) -> Result<Option<Request>, AppError> {
        Ok(self.inner.lock().await.requests.get(id).cloned())
    }

    async fn list(&self, scope: &RequestScope) -> Result<Vec<Request>, AppError> {
        let store = self.inner.lock().await;
        Ok(store.requests_where(|r| !r.is_deleted() && scope.matches(r)))
    }

    async fn list_unassigned(
        &self,
        company_id: &CompanyId,
        admin_id: &UserId,
    ) -> Result<Vec<Request>, AppError> {
        let store = self.inner.lock().await;
        Ok(store.requests_where(|r| {
            &r.company_id == company_id
                && r.is_pending()
                && r.assigned_to.as_ref().map_or(true, |a| a == admin_id)
        }))
    }

    async fn apply_transition(&self, transition: &StatusTransition) -> Result<Request, AppError> {
        let mut store = self.inner.lock().await;

        let request = store
            .requests
            .get(&transition.request_id)
            .ok_or_else(|| AppError::NotFound("Request not found".into()))?;
        if !request.is_pending() {
            return Err(AppError::NotPending);
        }

        if let Some(debit) = &transition.debit {
            match store.users.get_mut(&debit.user_id) {
                Some(owner) => {
                    owner.leave_balance = ledger::apply_debit(owner.leave_balance, debit);
                    owner.updated_at = transition.at;
                }
                None => tracing::warn!(
                    request_id = %transition.request_id,
                    user_id = %debit.user_id,
                    "request owner no longer exists; skipping leave deduction"
                ),
            }
        }

        let request = store
            .requests
            .get_mut(&transition.request_id)
            .ok_or_else(|| AppError::NotFound("Request not found".into()))?;
        transition.apply_to(request);
        Ok(request.clone())
    }

    async fn soft_delete(&self, id: &RequestId, at: DateTime<Utc>) -> Result<bool, AppError> {
        let mut store = self.inner.lock().await;
        match store.requests.get_mut(id) {
            Some(request) if !request.is_deleted() => {
                request.status = RequestStatus::Deleted;
                request.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_ids_by_owner_and_status(
        &self,
        owner: &UserId,
        status: RequestStatus,
    ) -> Result<Vec<RequestId>, AppError> {
        let store = self.inner.lock().await;
        Ok(store
            .requests_where(|r| &r.user_id == owner && r.status == status)
            .into_iter()
            .map(|r| r.id)
            .collect())
    }

    async fn delete(&self, id: &RequestId) -> Result<bool, AppError> {
        Ok(self.inner.lock().await.requests.remove(id).is_some())
    }
}

#[async_trait]
impl AdminRequestRepository for MemoryStore {
    async fn create(&self, request: &AdminRequest) -> Result<AdminRequest, AppError> {
        let mut store = self.inner.lock().await;
        if store
            .admin_requests
            .values()
            .any(|r| r.user_id == request.user_id && r.is_pending())
        {
            return Err(AppError::BadRequest(
                "You already have a pending request".into(),
            ));
        }
        store
            .admin_requests
            .insert(request.id.clone(), request.clone());
        Ok(request.clone())
    }

    async fn find_by_id(&self, id: &AdminRequestId) -> Result<Option<AdminRequest>, AppError> {
        Ok(self.inner.lock().await.admin_requests.get(id).cloned())
    }

    async fn find_pending_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AdminRequest>, AppError> {
        let store = self.inner.lock().await;
        Ok(store
            .admin_requests
            .values()
            .find(|r| &r.user_id == user_id && r.is_pending())
            .cloned())
    }

    async fn list_pending(&self, company_id: &CompanyId) -> Result<Vec<AdminRequest>, AppError> {
        let store = self.inner.lock().await;
        let mut pending: Vec<AdminRequest> = store
            .admin_requests
            .values()
            .filter(|r| &r.company_id == company_id && r.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
        Ok(pending)
    }

    async fn decide(
        &self,
        id: &AdminRequestId,
        status: AdminRequestStatus,
        at: DateTime<Utc>,
    ) -> Result<AdminRequest, AppError> {
        let mut store = self.inner.lock().await;
        let request = store
            .admin_requests
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Request not found".into()))?;
        if !request.is_pending() {
            return Err(AppError::NotPending);
        }
        request.status = status;
        match status {
            AdminRequestStatus::Approved => request.approved_at = Some(at),
            AdminRequestStatus::Rejected => request.rejected_at = Some(at),
            AdminRequestStatus::Pending => {}
        }
        Ok(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        request::{LeaveDetails, NewRequest, RequestKind},
        user::LeaveBalance,
    };
    use crate::services::lifecycle::plan_transition;
    use chrono::{Duration, NaiveDate};

    fn user(id: &str, role: UserRole, department: Option<&str>) -> User {
        User::new(
            UserId::from(id),
            CompanyId::from("acme"),
            format!("{id}@example.com"),
            id.to_string(),
            role,
            department.map(str::to_string),
            None,
            LeaveBalance {
                annual: 20,
                sick: 8,
                personal: 0,
                emergency: 0,
            },
        )
    }

    fn sick_leave(owner: &User, days: i32) -> Request {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Request::new(
            owner,
            NewRequest {
                category: "HR".into(),
                kind: RequestKind::Leave(LeaveDetails {
                    start_date: start,
                    end_date: start,
                    days,
                    leave_type: "sick".into(),
                    deduct: true,
                }),
                title: "Flu".into(),
                description: "Sick".into(),
                priority: "Normal".into(),
            },
            None,
        )
    }

    #[tokio::test]
    async fn earliest_admin_wins_department_lookup() {
        let store = MemoryStore::new();
        let mut late = user("b-late", UserRole::Admin, Some("IT"));
        late.created_at = Utc::now();
        let mut early = user("z-early", UserRole::Admin, Some("IT"));
        early.created_at = late.created_at - Duration::seconds(10);
        UserRepository::create(&store, &late).await.unwrap();
        UserRepository::create(&store, &early).await.unwrap();

        let found = store
            .find_department_admin(&CompanyId::from("acme"), "IT")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, UserId::from("z-early"));
    }

    #[tokio::test]
    async fn second_transition_is_not_pending_and_debits_once() {
        let store = MemoryStore::new();
        let owner = user("owner", UserRole::User, None);
        UserRepository::create(&store, &owner).await.unwrap();
        let request = sick_leave(&owner, 3);
        RequestRepository::create(&store, &request).await.unwrap();

        let plan = plan_transition(&request, RequestStatus::Completed, None, Utc::now()).unwrap();
        store.apply_transition(&plan).await.unwrap();
        let err = store.apply_transition(&plan).await.unwrap_err();
        assert!(matches!(err, AppError::NotPending));

        let owner = UserRepository::find_by_id(&store, &owner.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.leave_balance.sick, 5);
    }

    #[tokio::test]
    async fn stale_user_update_keeps_debit_and_login() {
        let store = MemoryStore::new();
        let owner = user("owner", UserRole::User, None);
        UserRepository::create(&store, &owner).await.unwrap();
        let request = sick_leave(&owner, 3);
        RequestRepository::create(&store, &request).await.unwrap();

        let mut stale = UserRepository::find_by_id(&store, &owner.id)
            .await
            .unwrap()
            .unwrap();
        let plan = plan_transition(&request, RequestStatus::Completed, None, Utc::now()).unwrap();
        store.apply_transition(&plan).await.unwrap();
        assert!(store.record_login(&owner.id, Utc::now()).await.unwrap());

        stale.job_title = Some("Analyst".into());
        let saved = UserRepository::update(&store, &stale).await.unwrap();
        assert_eq!(saved.job_title.as_deref(), Some("Analyst"));
        assert_eq!(saved.leave_balance.sick, 5);
        assert!(saved.last_login_at.is_some());
    }

    #[tokio::test]
    async fn concurrent_approvals_yield_one_success() {
        let store = MemoryStore::new();
        let owner = user("owner", UserRole::User, None);
        UserRepository::create(&store, &owner).await.unwrap();
        let request = sick_leave(&owner, 2);
        RequestRepository::create(&store, &request).await.unwrap();
        let plan = plan_transition(&request, RequestStatus::Completed, None, Utc::now()).unwrap();

        let (a, b) = tokio::join!(store.apply_transition(&plan), store.apply_transition(&plan));
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);

        let owner = UserRepository::find_by_id(&store, &owner.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(owner.leave_balance.sick, 6);
    }

    #[tokio::test]
    async fn deleted_requests_are_hidden_from_listings() {
        let store = MemoryStore::new();
        let owner = user("owner", UserRole::User, None);
        let request = sick_leave(&owner, 1);
        RequestRepository::create(&store, &request).await.unwrap();

        assert!(store.soft_delete(&request.id, Utc::now()).await.unwrap());
        assert!(!store.soft_delete(&request.id, Utc::now()).await.unwrap());

        let listed = store
            .list(&RequestScope::Owner(owner.id.clone()))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn one_open_admin_request_per_user() {
        let store = MemoryStore::new();
        let requester = user("u1", UserRole::User, None);
        AdminRequestRepository::create(&store, &AdminRequest::new(&requester))
            .await
            .unwrap();
        let err = AdminRequestRepository::create(&store, &AdminRequest::new(&requester))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
