//! Refresh-credential store adapters.
//!
//! Both adapters implement `warden_auth::CredentialStore`: one key per subject,
//! overwritten on every issuance, expiring with the refresh lifetime.

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use in_memory::InMemoryCredentialStore;
#[cfg(feature = "redis")]
pub use self::redis::RedisCredentialStore;

/// Key prefix for refresh credentials in shared key-value stores.
pub const DEFAULT_KEY_PREFIX: &str = "warden:refresh";

pub(crate) fn refresh_key(prefix: &str, subject: warden_core::SubjectId) -> String {
    format!("{prefix}:{subject}")
}
