use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::{
    error::ClientError,
    types::{
        AdminRequest, AdminRequestOutcome, AdminRequests, Company, CompanyEnvelope,
        CompanyLookup, Health, Message, NewLeaveRequest, NewRequest, NotificationFeed,
        ProfileUpdate, PurgeResult, Registered, Registration, Request, RequestOutcome,
        RequestStatus, Requests, RoleChange, SettingsUpdate, User, UserData, UserEnvelope,
        Users,
    },
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ApiClientBuilder {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl ApiClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Identity-provider ID token sent as `Authorization: Bearer`.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(ApiClient {
            client,
            base_url,
            token: self.token,
        })
    }
}

/// Typed access to every OfficeDesk endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn builder(base_url: impl Into<String>) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Same connection pool, different credential.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "api call failed");
            return Err(ClientError::from_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn with_body<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(method, path).json(body)).await
    }

    // Public endpoints

    pub async fn health(&self) -> Result<Health, ClientError> {
        self.get("/health").await
    }

    pub async fn verify_company_code(&self, code: &str) -> Result<CompanyLookup, ClientError> {
        self.with_body(
            Method::POST,
            "/api/verify-company-code",
            &json!({ "companyCode": code }),
        )
        .await
    }

    // Accounts

    pub async fn register(&self, registration: &Registration) -> Result<Registered, ClientError> {
        self.with_body(Method::POST, "/api/auth/register", registration)
            .await
    }

    pub async fn user_data(&self) -> Result<UserData, ClientError> {
        self.get("/api/auth/user-data").await
    }

    // Requests

    pub async fn create_request(&self, draft: &NewRequest) -> Result<RequestOutcome, ClientError> {
        self.with_body(Method::POST, "/api/requests", draft).await
    }

    pub async fn list_requests(&self) -> Result<Vec<Request>, ClientError> {
        let list: Requests = self.get("/api/requests").await?;
        Ok(list.requests)
    }

    pub async fn update_request_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        comments: Option<&str>,
    ) -> Result<RequestOutcome, ClientError> {
        let mut body = json!({ "status": status.as_str() });
        if let Some(comments) = comments {
            body["comments"] = Value::from(comments);
        }
        self.with_body(
            Method::PUT,
            &format!("/api/requests/{}/status", request_id),
            &body,
        )
        .await
    }

    pub async fn delete_request(&self, request_id: &str) -> Result<String, ClientError> {
        let reply: Message = self
            .send(self.request(Method::DELETE, &format!("/api/requests/{}", request_id)))
            .await?;
        Ok(reply.message)
    }

    pub async fn clear_history(&self, status: RequestStatus) -> Result<PurgeResult, ClientError> {
        self.with_body(
            Method::POST,
            "/api/requests/clear-history",
            &json!({ "status": status.as_str() }),
        )
        .await
    }

    pub async fn bulk_delete(&self, status: RequestStatus) -> Result<PurgeResult, ClientError> {
        self.with_body(
            Method::DELETE,
            "/api/requests/bulk-delete",
            &json!({ "status": status.as_str() }),
        )
        .await
    }

    pub async fn unassigned_requests(&self) -> Result<Vec<Request>, ClientError> {
        let list: Requests = self.get("/api/requests/unassigned").await?;
        Ok(list.requests)
    }

    // Leave

    pub async fn create_leave_request(
        &self,
        draft: &NewLeaveRequest,
    ) -> Result<RequestOutcome, ClientError> {
        self.with_body(Method::POST, "/api/leave-requests", draft)
            .await
    }

    pub async fn list_leave_requests(&self) -> Result<Vec<Request>, ClientError> {
        let list: Requests = self.get("/api/leave-requests").await?;
        Ok(list.requests)
    }

    pub async fn approve_leave_request(
        &self,
        request_id: &str,
        comments: Option<&str>,
    ) -> Result<Request, ClientError> {
        self.decide_leave(request_id, "approve", comments).await
    }

    pub async fn reject_leave_request(
        &self,
        request_id: &str,
        comments: Option<&str>,
    ) -> Result<Request, ClientError> {
        self.decide_leave(request_id, "reject", comments).await
    }

    async fn decide_leave(
        &self,
        request_id: &str,
        action: &str,
        comments: Option<&str>,
    ) -> Result<Request, ClientError> {
        let outcome: RequestOutcome = self
            .with_body(
                Method::POST,
                &format!("/api/leave-requests/{}/{}", request_id, action),
                &json!({ "comments": comments }),
            )
            .await?;
        Ok(outcome.request)
    }

    // Company

    pub async fn company_settings(&self) -> Result<Company, ClientError> {
        let envelope: CompanyEnvelope = self.get("/api/company/settings").await?;
        Ok(envelope.company)
    }

    pub async fn update_company_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<Company, ClientError> {
        let envelope: CompanyEnvelope = self
            .with_body(Method::PUT, "/api/company/settings", update)
            .await?;
        Ok(envelope.company)
    }

    pub async fn company_users(&self) -> Result<Vec<User>, ClientError> {
        let list: Users = self.get("/api/company/users").await?;
        Ok(list.users)
    }

    // Admin requests

    pub async fn request_admin(&self) -> Result<AdminRequest, ClientError> {
        let outcome: AdminRequestOutcome = self
            .send(self.request(Method::POST, "/api/request-admin"))
            .await?;
        Ok(outcome.request)
    }

    pub async fn admin_requests(&self) -> Result<Vec<AdminRequest>, ClientError> {
        let list: AdminRequests = self.get("/api/admin-requests").await?;
        Ok(list.requests)
    }

    /// Approves and returns the promoted user.
    pub async fn approve_admin_request(&self, request_id: &str) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self
            .send(self.request(
                Method::POST,
                &format!("/api/admin-requests/{}/approve", request_id),
            ))
            .await?;
        Ok(envelope.user)
    }

    pub async fn reject_admin_request(&self, request_id: &str) -> Result<AdminRequest, ClientError> {
        let outcome: AdminRequestOutcome = self
            .send(self.request(
                Method::POST,
                &format!("/api/admin-requests/{}/reject", request_id),
            ))
            .await?;
        Ok(outcome.request)
    }

    // Users

    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self.get(&format!("/api/users/{}", user_id)).await?;
        Ok(envelope.user)
    }

    pub async fn update_role(&self, user_id: &str, change: &RoleChange) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self
            .with_body(Method::PUT, &format!("/api/users/{}/role", user_id), change)
            .await?;
        Ok(envelope.user)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<User, ClientError> {
        let envelope: UserEnvelope = self
            .with_body(
                Method::PUT,
                &format!("/api/users/{}/profile", user_id),
                update,
            )
            .await?;
        Ok(envelope.user)
    }

    pub async fn record_login(&self, user_id: &str) -> Result<(), ClientError> {
        let _: Message = self
            .send(self.request(Method::POST, &format!("/api/users/{}/login", user_id)))
            .await?;
        Ok(())
    }

    pub async fn notifications(&self, user_id: &str) -> Result<NotificationFeed, ClientError> {
        self.get(&format!("/api/users/{}/notifications", user_id))
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<(), ClientError> {
        let _: Message = self
            .send(self.request(Method::DELETE, &format!("/api/users/{}", user_id)))
            .await?;
        Ok(())
    }

    /// Returns the server's confirmation message and the promoted user.
    pub async fn promote_to_admin(
        &self,
        user_id: &str,
        department: &str,
    ) -> Result<(String, User), ClientError> {
        #[derive(serde::Deserialize)]
        struct Promoted {
            message: String,
            user: User,
        }
        let promoted: Promoted = self
            .with_body(
                Method::POST,
                "/api/promote-to-admin",
                &json!({ "userId": user_id, "department": department }),
            )
            .await?;
        Ok((promoted.message, promoted.user))
    }
}
