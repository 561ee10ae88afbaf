use std::sync::Arc;

use futures::future::BoxFuture;
use moka::future::Cache;

use crate::{
    config::SessionConfig,
    error::ServiceResult,
    services::session::types::{AuthGrant, UserRecord},
};

/// Identity service (`/auth/login`, `/auth/register`, `/auth/me`).
pub trait IdentityService: Send + Sync {
    fn login<'a>(&'a self, email: &'a str, password: &'a str)
    -> BoxFuture<'a, ServiceResult<AuthGrant>>;

    fn register<'a>(&'a self, email: &'a str, password: &'a str)
    -> BoxFuture<'a, ServiceResult<()>>;

    fn who_am_i<'a>(&'a self, token: &'a str) -> BoxFuture<'a, ServiceResult<UserRecord>>;
}

/// Identity service fronted by a per-token user cache, so the user record is fetched once
/// per token and refetched lazily after the entry expires.
#[derive(Clone)]
pub struct UserDirectory {
    service: Arc<dyn IdentityService>,
    users: Cache<String, Arc<UserRecord>>,
}

impl UserDirectory {
    pub fn new(service: Arc<dyn IdentityService>, config: &SessionConfig) -> Self {
        Self {
            service,
            users: Cache::builder()
                .max_capacity(config.user_cache_max_capacity)
                .time_to_live(config.user_cache_ttl)
                .build(),
        }
    }

    pub fn service(&self) -> &Arc<dyn IdentityService> {
        &self.service
    }

    /// Asks the service directly, bypassing the cache. Used to prove a stored token is
    /// still accepted.
    pub async fn validate(&self, token: &str) -> ServiceResult<Arc<UserRecord>> {
        let user = Arc::new(self.service.who_am_i(token).await?);
        self.users.insert(token.to_string(), user.clone()).await;
        Ok(user)
    }

    pub async fn who_am_i(&self, token: &str) -> ServiceResult<Arc<UserRecord>> {
        if let Some(user) = self.users.get(token).await {
            return Ok(user);
        }
        self.validate(token).await
    }

    pub async fn remember(&self, token: &str, user: UserRecord) {
        self.users.insert(token.to_string(), Arc::new(user)).await;
    }
}
