//! Subjects (user accounts) and the identity lookup port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use warden_core::SubjectId;

use crate::Role;

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubjectStatus {
    /// Subject may authenticate.
    #[default]
    Active,
    /// Subject is blocked and cannot authenticate or renew.
    Blocked,
}

/// An authenticated identity as held by the user directory.
///
/// `role` is kept as the stored string: a value outside the role table is a
/// data-integrity problem that surfaces when capabilities are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub username: String,
    pub role: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub status: SubjectStatus,
    pub created_at: DateTime<Utc>,
}

impl Subject {
    pub fn new(
        username: impl Into<String>,
        role: Role,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SubjectId::new(),
            username: username.into(),
            role: role.as_str().to_string(),
            password_hash: password_hash.into(),
            status: SubjectStatus::Active,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SubjectStatus::Active
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("user directory unavailable: {0}")]
    Unavailable(String),
}

/// Identity lookup (account storage lives elsewhere).
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Subject>, DirectoryError>;

    async fn find_by_id(&self, id: SubjectId) -> Result<Option<Subject>, DirectoryError>;

    /// Register a new subject. Usernames are unique.
    async fn insert(&self, subject: Subject) -> Result<(), DirectoryError>;
}

#[async_trait]
impl<D> UserDirectory for Arc<D>
where
    D: UserDirectory + ?Sized,
{
    async fn find_by_username(&self, username: &str) -> Result<Option<Subject>, DirectoryError> {
        (**self).find_by_username(username).await
    }

    async fn find_by_id(&self, id: SubjectId) -> Result<Option<Subject>, DirectoryError> {
        (**self).find_by_id(id).await
    }

    async fn insert(&self, subject: Subject) -> Result<(), DirectoryError> {
        (**self).insert(subject).await
    }
}
