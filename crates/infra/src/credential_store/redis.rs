//! Redis-backed credential store.
//!
//! - **Key**: `warden:refresh:<subject>` (one key per subject)
//! - **put**: `SET key token EX <ttl>` (overwrite + expiry in one command)
//! - **get**: `GET key`
//! - **delete**: `DEL key` (0 or 1 keys removed, both succeed)
//!
//! Redis provides per-key atomicity, so concurrent renewals for one subject
//! resolve last-writer-wins without in-process locking.

use async_trait::async_trait;
use chrono::Duration;
use redis::aio::ConnectionManager;
use tracing::instrument;

use warden_auth::{CredentialStore, StoreError};
use warden_core::SubjectId;

use super::{refresh_key, DEFAULT_KEY_PREFIX};

#[derive(Clone)]
pub struct RedisCredentialStore {
    conn: ConnectionManager,
    key_prefix: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RedisStoreError {
    #[error("Redis connection error: {0}")]
    Connection(String),
}

impl RedisCredentialStore {
    /// Connect to Redis.
    ///
    /// # Arguments
    ///
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `key_prefix` - key namespace (default: "warden:refresh")
    pub async fn connect(
        redis_url: impl AsRef<str>,
        key_prefix: Option<String>,
    ) -> Result<Self, RedisStoreError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisStoreError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| RedisStoreError::Connection(e.to_string()))?;

        Ok(Self {
            conn,
            key_prefix: key_prefix.unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        })
    }

    fn key(&self, subject: SubjectId) -> String {
        refresh_key(&self.key_prefix, subject)
    }
}

fn unavailable(err: redis::RedisError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl CredentialStore for RedisCredentialStore {
    #[instrument(skip(self, refresh), fields(key_prefix = %self.key_prefix), err)]
    async fn put(&self, subject: SubjectId, refresh: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        // EX must be a positive integer.
        let seconds = ttl.num_seconds().max(1);

        let _: () = redis::cmd("SET")
            .arg(self.key(subject))
            .arg(refresh)
            .arg("EX")
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    #[instrument(skip(self), fields(key_prefix = %self.key_prefix), err)]
    async fn get(&self, subject: SubjectId) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(self.key(subject))
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(value)
    }

    #[instrument(skip(self), fields(key_prefix = %self.key_prefix), err)]
    async fn delete(&self, subject: SubjectId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _removed: i64 = redis::cmd("DEL")
            .arg(self.key(subject))
            .query_async(&mut conn)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
