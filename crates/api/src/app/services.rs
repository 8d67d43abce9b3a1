use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use warden_auth::{CredentialStore, PasswordScheme, SessionService, UserDirectory};
use warden_core::{Clock, SystemClock};
use warden_infra::{
    AppConfig, Argon2Passwords, ConfigError, InMemoryCredentialStore, InMemoryUserDirectory,
    RedisCredentialStore,
};

use crate::app::catalog::ProductCatalog;

pub type DynCredentialStore = Arc<dyn CredentialStore>;
pub type DynUserDirectory = Arc<dyn UserDirectory>;
pub type Sessions = SessionService<DynCredentialStore, DynUserDirectory>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("credential store: {0}")]
    Store(String),
}

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppServices {
    pub sessions: Sessions,
    pub directory: Arc<InMemoryUserDirectory>,
    pub products: ProductCatalog,
    pub clock: Arc<dyn Clock>,
}

impl AppServices {
    /// Wire services over an explicit store, password scheme and clock.
    pub fn new(
        config: &AppConfig,
        store: DynCredentialStore,
        passwords: Arc<dyn PasswordScheme>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, BuildError> {
        let keys = Arc::new(config.signing_keys()?);
        let directory = Arc::new(InMemoryUserDirectory::new());

        let sessions = SessionService::new(
            keys,
            config.session_config(),
            store,
            directory.clone() as DynUserDirectory,
            passwords,
            clock.clone(),
        );

        Ok(Self {
            sessions,
            directory,
            products: ProductCatalog::new(),
            clock,
        })
    }
}

/// Production wiring: system clock, Argon2id, Redis when `REDIS_URL` is set.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, BuildError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let store: DynCredentialStore = match &config.redis_url {
        Some(url) => {
            let store = RedisCredentialStore::connect(url, None)
                .await
                .map_err(|e| BuildError::Store(e.to_string()))?;
            info!("credential store: redis");
            Arc::new(store)
        }
        None => {
            warn!("REDIS_URL not set; refresh tokens are held in process memory");
            Arc::new(InMemoryCredentialStore::new(clock.clone()))
        }
    };

    AppServices::new(config, store, Arc::new(Argon2Passwords::default()), clock)
}
