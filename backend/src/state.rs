use std::{future::Future, sync::Arc, time::Duration};

use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    identity::{IdentityProvider, JwtIdentityProvider},
    repositories::{
        AdminRequestRepository, CompanyRepository, MemoryStore, PgAdminRequestRepository,
        PgCompanyRepository, PgRequestRepository, PgUserRepository, RequestRepository,
        UserRepository,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub identity: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub requests: Arc<dyn RequestRepository>,
    pub admin_requests: Arc<dyn AdminRequestRepository>,
}

impl AppState {
    /// Postgres-backed state with the configured JWT identity provider.
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        let identity = Arc::new(JwtIdentityProvider::from_config(&config));
        Self {
            identity,
            users: Arc::new(PgUserRepository::new(pool.clone())),
            companies: Arc::new(PgCompanyRepository::new(pool.clone())),
            requests: Arc::new(PgRequestRepository::new(pool.clone())),
            admin_requests: Arc::new(PgAdminRequestRepository::new(pool)),
            config,
        }
    }

    /// State over a single in-memory store.
    pub fn memory(config: Config, store: MemoryStore) -> Self {
        let identity = Arc::new(JwtIdentityProvider::from_config(&config));
        Self {
            identity,
            users: Arc::new(store.clone()),
            companies: Arc::new(store.clone()),
            requests: Arc::new(store.clone()),
            admin_requests: Arc::new(store),
            config,
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.config.store_timeout_ms)
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(self.config.identity_timeout_ms)
    }

    /// Runs a store operation under the configured store timeout.
    pub async fn store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        tokio::time::timeout(self.store_timeout(), op)
            .await
            .map_err(|_| AppError::Timeout("document store"))?
    }
}
