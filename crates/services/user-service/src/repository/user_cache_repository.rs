//! Cached copies of users, keyed `users:<id>`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::infra::cache::{cache_key, CacheClient};
use common::{AppError, AppResult};
use domain::{User, USER_CACHE_PREFIX, USER_CACHE_TTL_SECONDS};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserCacheRepository: Send + Sync {
    /// Store the full user as JSON.
    async fn set_user(&self, user: &User) -> AppResult<()>;

    /// Cached user, or `None` on a miss.
    async fn get_user(&self, id: u64) -> AppResult<Option<User>>;

    /// Drop cached entries for `ids`.
    async fn invalidate(&self, ids: &[u64]) -> AppResult<()>;
}

pub struct UserCacheStore {
    client: Arc<dyn CacheClient>,
    ttl: Duration,
}

impl UserCacheStore {
    pub fn new(client: Arc<dyn CacheClient>) -> Self {
        Self {
            client,
            ttl: Duration::from_secs(USER_CACHE_TTL_SECONDS),
        }
    }

    fn key(id: u64) -> String {
        cache_key(USER_CACHE_PREFIX, id)
    }
}

#[async_trait]
impl UserCacheRepository for UserCacheStore {
    async fn set_user(&self, user: &User) -> AppResult<()> {
        let value = serde_json::to_string(user)
            .map_err(|e| AppError::internal(format!("Serialization error: {}", e)))?;
        self.client.set(&Self::key(user.id), value, self.ttl).await
    }

    async fn get_user(&self, id: u64) -> AppResult<Option<User>> {
        let Some(raw) = self.client.get(&Self::key(id)).await? else {
            return Ok(None);
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AppError::internal(format!("Corrupt cache entry for user {}: {}", id, e)))
    }

    async fn invalidate(&self, ids: &[u64]) -> AppResult<()> {
        let keys: Vec<String> = ids.iter().map(|id| Self::key(*id)).collect();
        self.client.del(&keys).await
    }
}
