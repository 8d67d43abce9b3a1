use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use warden_auth::{CredentialStore, StoreError};
use warden_core::{Clock, SubjectId};

#[derive(Debug, Clone)]
struct Entry {
    token: String,
    expires_at: DateTime<Utc>,
}

/// In-memory credential store for tests/dev.
///
/// TTLs are evaluated against the injected clock; expired entries read as
/// absent and are purged on the next write.
pub struct InMemoryCredentialStore {
    entries: RwLock<HashMap<SubjectId, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCredentialStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of live (unexpired) entries.
    pub fn live_entries(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .map(|map| map.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn put(&self, subject: SubjectId, refresh: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = self.clock.now();
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        map.retain(|_, e| e.expires_at > now);
        map.insert(
            subject,
            Entry {
                token: refresh.to_string(),
                expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            },
        );
        Ok(())
    }

    async fn get(&self, subject: SubjectId) -> Result<Option<String>, StoreError> {
        let now = self.clock.now();
        let map = self.entries.read().map_err(|_| poisoned())?;
        Ok(map
            .get(&subject)
            .filter(|e| e.expires_at > now)
            .map(|e| e.token.clone()))
    }

    async fn delete(&self, subject: SubjectId) -> Result<(), StoreError> {
        let mut map = self.entries.write().map_err(|_| poisoned())?;
        map.remove(&subject);
        Ok(())
    }
}
