//! Configuration loading and representation.
//!
//! Read once at startup from the process environment. Signing keys derived
//! from it are immutable for the life of the process.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use warden_auth::{KeyError, SessionConfig, SigningKeys, TokenLifetimes};

const DEFAULT_ISSUER: &str = "warden";
const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
const DEFAULT_REFRESH_TTL_HOURS: i64 = 720;
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("token lifetimes must be positive, access shorter than refresh, refresh at most ten years")]
    InvalidLifetimes,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Where the token signing keys come from.
#[derive(Clone, PartialEq, Eq)]
pub enum SigningSource {
    /// HS256 shared secret.
    Secret(String),
    /// EdDSA PEM key pair on disk.
    Ed25519 {
        private_key_path: PathBuf,
        public_key_path: PathBuf,
    },
}

impl core::fmt::Debug for SigningSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SigningSource::Secret(_) => f.write_str("Secret(<redacted>)"),
            SigningSource::Ed25519 {
                private_key_path,
                public_key_path,
            } => f
                .debug_struct("Ed25519")
                .field("private_key_path", private_key_path)
                .field("public_key_path", public_key_path)
                .finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub signing: SigningSource,
    pub issuer: String,
    pub lifetimes: TokenLifetimes,
    /// Credential store; in-memory when unset.
    pub redis_url: Option<String>,
    pub server_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let signing = match (get("JWT_PRIVATE_KEY_PATH"), get("JWT_PUBLIC_KEY_PATH")) {
            (Some(private), Some(public)) => SigningSource::Ed25519 {
                private_key_path: PathBuf::from(private),
                public_key_path: PathBuf::from(public),
            },
            (None, None) => SigningSource::Secret(get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?),
            (Some(_), None) => return Err(ConfigError::Missing("JWT_PUBLIC_KEY_PATH")),
            (None, Some(_)) => return Err(ConfigError::Missing("JWT_PRIVATE_KEY_PATH")),
        };

        let access_minutes = parse_i64(&get, "JWT_ACCESS_TTL_MINUTES", DEFAULT_ACCESS_TTL_MINUTES)?;
        let refresh_hours = parse_i64(&get, "JWT_REFRESH_TTL_HOURS", DEFAULT_REFRESH_TTL_HOURS)?;
        let lifetimes = TokenLifetimes::new(
            Duration::try_minutes(access_minutes).ok_or(ConfigError::InvalidLifetimes)?,
            Duration::try_hours(refresh_hours).ok_or(ConfigError::InvalidLifetimes)?,
        )
        .ok_or(ConfigError::InvalidLifetimes)?;

        let server_addr = get("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "SERVER_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Self {
            signing,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()),
            lifetimes,
            redis_url: get("REDIS_URL"),
            server_addr,
        })
    }

    /// Load the signing key material (reads key files for EdDSA).
    pub fn signing_keys(&self) -> Result<SigningKeys, ConfigError> {
        match &self.signing {
            SigningSource::Secret(secret) => Ok(SigningKeys::hs256(secret.as_bytes())?),
            SigningSource::Ed25519 {
                private_key_path,
                public_key_path,
            } => {
                let private = read(private_key_path)?;
                let public = read(public_key_path)?;
                Ok(SigningKeys::ed25519_pem(&private, &public)?)
            }
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            issuer: self.issuer.clone(),
            lifetimes: self.lifetimes,
        }
    }
}

fn parse_i64<G>(get: &G, var: &'static str, default: i64) -> Result<i64, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

fn read(path: &PathBuf) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })
}
