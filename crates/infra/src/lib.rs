//! Infrastructure layer: credential stores, user directory, password hashing,
//! configuration.

pub mod config;
pub mod credential_store;
pub mod directory;
pub mod passwords;


pub use config::{AppConfig, ConfigError, SigningSource};
pub use credential_store::InMemoryCredentialStore;
#[cfg(feature = "redis")]
pub use credential_store::RedisCredentialStore;
pub use directory::InMemoryUserDirectory;
pub use passwords::Argon2Passwords;
