//! Key-value cache client.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisError};
use tracing::debug;

use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Build a namespaced key: `<prefix>:<key>`.
pub fn cache_key(prefix: &str, key: impl Display) -> String {
    format!("{}:{}", prefix, key)
}

/// String cache with per-entry expiry.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()>;

    /// Read `key`; a missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove every key in `keys`.
    async fn del(&self, keys: &[String]) -> AppResult<()>;
}

/// Redis-backed cache client.
///
/// Failures are returned, not logged; callers decide whether they matter.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        debug!("Connecting to Redis");
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn set(&self, key: &str, value: String, ttl: Duration) -> AppResult<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await
            .map_err(AppError::from)
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(AppError::from)
    }

    async fn del(&self, keys: &[String]) -> AppResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys.to_vec())
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_joins_with_colon() {
        assert_eq!(cache_key("users", 42), "users:42");
        assert_eq!(cache_key("sessions", "abc"), "sessions:abc");
    }
}
