//! In-memory user directory for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use warden_auth::{DirectoryError, Subject, SubjectStatus, UserDirectory};
use warden_core::SubjectId;

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    subjects: RwLock<HashMap<SubjectId, Subject>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored role name. Not validated: the directory stores
    /// whatever it is given.
    pub fn set_role(&self, id: SubjectId, role: &str) -> Result<(), DirectoryError> {
        self.update(id, |s| s.role = role.to_string())
    }

    pub fn set_status(&self, id: SubjectId, status: SubjectStatus) -> Result<(), DirectoryError> {
        self.update(id, |s| s.status = status)
    }

    pub fn remove(&self, id: SubjectId) -> Result<Option<Subject>, DirectoryError> {
        let mut map = self.subjects.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id))
    }

    fn update(&self, id: SubjectId, f: impl FnOnce(&mut Subject)) -> Result<(), DirectoryError> {
        let mut map = self.subjects.write().map_err(|_| poisoned())?;
        if let Some(subject) = map.get_mut(&id) {
            f(subject);
        }
        Ok(())
    }
}

fn poisoned() -> DirectoryError {
    DirectoryError::Unavailable("in-memory directory lock poisoned".to_string())
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<Subject>, DirectoryError> {
        let map = self.subjects.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|s| s.username == username).cloned())
    }

    async fn find_by_id(&self, id: SubjectId) -> Result<Option<Subject>, DirectoryError> {
        let map = self.subjects.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn insert(&self, subject: Subject) -> Result<(), DirectoryError> {
        let mut map = self.subjects.write().map_err(|_| poisoned())?;
        if map.values().any(|s| s.username == subject.username) {
            return Err(DirectoryError::UsernameTaken(subject.username));
        }
        map.insert(subject.id, subject);
        Ok(())
    }
}
