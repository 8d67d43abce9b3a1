//! Refresh-credential store port.
//!
//! Maps a subject to its single live refresh token. Writes overwrite, so at
//! most one refresh token per subject is ever accepted.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

use warden_core::SubjectId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store `refresh` for `subject`, replacing any previous value. The entry
    /// expires after `ttl` even without an explicit delete.
    async fn put(&self, subject: SubjectId, refresh: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, subject: SubjectId) -> Result<Option<String>, StoreError>;

    /// Idempotent: deleting an absent entry succeeds.
    async fn delete(&self, subject: SubjectId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    async fn put(&self, subject: SubjectId, refresh: &str, ttl: Duration) -> Result<(), StoreError> {
        (**self).put(subject, refresh, ttl).await
    }

    async fn get(&self, subject: SubjectId) -> Result<Option<String>, StoreError> {
        (**self).get(subject).await
    }

    async fn delete(&self, subject: SubjectId) -> Result<(), StoreError> {
        (**self).delete(subject).await
    }
}
