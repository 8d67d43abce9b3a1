//! Session protocol: sign-up, sign-in, authorize, renew, sign-out.
//!
//! Session state per subject is never stored as a field. A subject is *active*
//! while the credential store holds its refresh token and *anonymous*
//! otherwise. Access tokens are verified statelessly; only renewal and
//! sign-out touch the store.

use std::sync::Arc;

use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use warden_core::{Clock, DomainError, SubjectId, error::require_text};

use crate::{
    AccessClaims, AuthzError, Capability, CapabilitySet, CredentialStore, DirectoryError,
    PasswordError, PasswordScheme, Role, RoleError, SigningKeys, StoreError, Subject,
    TokenError, TokenIssuer, TokenLifetimes, TokenPair, TokenVerifier, UserDirectory, roles,
};

const MAX_FIELD_LEN: usize = 255;
const DECOY_PASSWORD: &str = "warden-decoy-password";

/// Protocol-level failure taxonomy.
///
/// Every variant rejects the current request only; none is fatal to the
/// process. `Malformed` and `SignatureInvalid` stay distinct here for logs and
/// are collapsed by the HTTP layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("role '{0}' does not exist")]
    UnknownRole(String),

    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("session has expired")]
    SessionExpired,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: missing capability '{0}'")]
    Forbidden(Capability),

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("user directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("failed to sign token: {0}")]
    SigningFailure(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Collaborator outages; the only kinds a caller might retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuthError::StoreUnavailable(_) | AuthError::DirectoryUnavailable(_)
        )
    }
}

impl From<TokenError> for AuthError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Malformed => AuthError::Malformed,
            TokenError::SignatureInvalid => AuthError::SignatureInvalid,
            TokenError::Expired => AuthError::Expired,
            TokenError::Signing(msg) => AuthError::SigningFailure(msg),
        }
    }
}

impl From<RoleError> for AuthError {
    fn from(value: RoleError) -> Self {
        match value {
            RoleError::UnknownRole(role) => AuthError::UnknownRole(role),
        }
    }
}

impl From<AuthzError> for AuthError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden(cap) => AuthError::Forbidden(cap),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(msg) => AuthError::StoreUnavailable(msg),
        }
    }
}

impl From<DirectoryError> for AuthError {
    fn from(value: DirectoryError) -> Self {
        match value {
            DirectoryError::UsernameTaken(name) => AuthError::UsernameTaken(name),
            DirectoryError::Unavailable(msg) => AuthError::DirectoryUnavailable(msg),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(value: PasswordError) -> Self {
        AuthError::Hashing(value.0)
    }
}

impl From<DomainError> for AuthError {
    fn from(value: DomainError) -> Self {
        AuthError::Validation(value.to_string())
    }
}

/// Token settings the session protocol is built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub issuer: String,
    pub lifetimes: TokenLifetimes,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            issuer: "warden".to_string(),
            lifetimes: TokenLifetimes::default(),
        }
    }
}

/// Orchestrates the token lifecycle over injected collaborators.
pub struct SessionService<S, D> {
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    store: S,
    directory: D,
    passwords: Arc<dyn PasswordScheme>,
    /// Hash verified against when the username is unknown, so a miss costs
    /// the same as a wrong password.
    decoy_hash: Option<String>,
    clock: Arc<dyn Clock>,
}

impl<S, D> SessionService<S, D>
where
    S: CredentialStore,
    D: UserDirectory,
{
    pub fn new(
        keys: Arc<SigningKeys>,
        config: SessionConfig,
        store: S,
        directory: D,
        passwords: Arc<dyn PasswordScheme>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let decoy_hash = passwords
            .hash(DECOY_PASSWORD)
            .inspect_err(|e| warn!(error = %e, "decoy password hash unavailable"))
            .ok();

        Self {
            issuer: TokenIssuer::new(keys.clone(), config.issuer.clone(), config.lifetimes),
            verifier: TokenVerifier::new(keys, &config.issuer),
            store,
            directory,
            passwords,
            decoy_hash,
            clock,
        }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.issuer.lifetimes()
    }

    /// Register a new active subject.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, username: &str, password: &str, role: Role) -> Result<Subject, AuthError> {
        require_text("username", username, MAX_FIELD_LEN)?;
        require_text("password", password, MAX_FIELD_LEN)?;

        let hash = self.passwords.hash(password)?;
        let subject = Subject::new(username, role, hash, self.clock.now());
        self.directory.insert(subject.clone()).await?;

        info!(subject = %subject.id, role = %role, "subject registered");
        Ok(subject)
    }

    /// Authenticate with username/password and open a session.
    ///
    /// Unknown usernames, wrong passwords and blocked accounts all report
    /// `InvalidCredentials`.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let Some(subject) = self.directory.find_by_username(username).await? else {
            if let Some(decoy) = &self.decoy_hash {
                let _ = self.passwords.verify(decoy, password);
            }
            info!("sign-in rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.passwords.verify(&subject.password_hash, password) {
            info!(subject = %subject.id, "sign-in rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !subject.is_active() {
            info!(subject = %subject.id, "sign-in rejected: account blocked");
            return Err(AuthError::InvalidCredentials);
        }

        let capabilities = resolve_capabilities(&subject)?;
        let tokens = self.open_session(subject.id, capabilities).await?;

        info!(subject = %subject.id, "session opened");
        Ok(tokens)
    }

    /// Verify an access token without checking any capability.
    pub fn authenticate(&self, access: &str) -> Result<AccessClaims, AuthError> {
        self.verifier
            .verify_access(access, self.clock.now())
            .map_err(|e| {
                log_token_rejection("access", &e);
                AuthError::from(e)
            })
    }

    /// Verify an access token and require `capability` in its claims.
    ///
    /// On `Expired` the caller should renew instead of retrying.
    pub fn authorize(&self, access: &str, capability: Capability) -> Result<AccessClaims, AuthError> {
        let claims = self.authenticate(access)?;
        crate::authorize(&claims, capability).map_err(|e| {
            debug!(subject = %claims.sub, capability = %capability, "request forbidden");
            AuthError::from(e)
        })?;
        Ok(claims)
    }

    /// Exchange a (possibly expired) access token plus the current refresh
    /// token for a new pair. The store entry is overwritten, so the presented
    /// refresh token cannot be redeemed twice.
    #[instrument(skip_all, fields(subject))]
    pub async fn renew(&self, access: &str, refresh: &str) -> Result<TokenPair, AuthError> {
        let now = self.clock.now();

        let access_claims = self
            .verifier
            .decode_access_ignoring_expiry(access)
            .map_err(|e| {
                log_token_rejection("access", &e);
                AuthError::Unauthorized
            })?;
        let subject = access_claims.sub;
        tracing::Span::current().record("subject", tracing::field::display(subject));

        let refresh_claims = self.verifier.verify_refresh(refresh, now).map_err(|e| {
            log_token_rejection("refresh", &e);
            AuthError::SessionExpired
        })?;

        if refresh_claims.sub != subject {
            warn!(refresh_subject = %refresh_claims.sub, "renewal rejected: subject mismatch");
            return Err(AuthError::SessionExpired);
        }

        let stored = self.store.get(subject).await?;
        let matches = stored
            .as_deref()
            .is_some_and(|current| bool::from(current.as_bytes().ct_eq(refresh.as_bytes())));
        if !matches {
            info!("renewal rejected: refresh token superseded or revoked");
            return Err(AuthError::SessionExpired);
        }

        let record = match self.directory.find_by_id(subject).await? {
            Some(record) if record.is_active() => record,
            _ => {
                info!("renewal rejected: subject missing or blocked");
                self.store.delete(subject).await?;
                return Err(AuthError::SessionExpired);
            }
        };

        // Re-resolve from the current role so role changes apply from here on.
        let capabilities = resolve_capabilities(&record)?;
        let tokens = self.open_session(subject, capabilities).await?;

        info!("session renewed");
        Ok(tokens)
    }

    /// Revoke the subject's refresh token. Idempotent.
    #[instrument(skip_all, fields(subject))]
    pub async fn sign_out(&self, access: &str) -> Result<(), AuthError> {
        let claims = self.authenticate(access)?;
        tracing::Span::current().record("subject", tracing::field::display(claims.sub));

        self.store.delete(claims.sub).await?;
        info!("session closed");
        Ok(())
    }

    async fn open_session(
        &self,
        subject: SubjectId,
        capabilities: CapabilitySet,
    ) -> Result<TokenPair, AuthError> {
        let tokens = self.issuer.issue(subject, capabilities, self.clock.now())?;
        self.store
            .put(subject, &tokens.refresh, self.issuer.lifetimes().refresh)
            .await?;
        Ok(tokens)
    }
}

fn resolve_capabilities(subject: &Subject) -> Result<CapabilitySet, AuthError> {
    roles::resolve(&subject.role).map_err(|e| {
        error!(subject = %subject.id, role = %subject.role, "stored role is not in the role table");
        AuthError::from(e)
    })
}

fn log_token_rejection(kind: &'static str, err: &TokenError) {
    match err {
        TokenError::Expired => debug!(token = kind, "token expired"),
        TokenError::Malformed => debug!(token = kind, "token malformed"),
        TokenError::SignatureInvalid => warn!(token = kind, "token signature invalid"),
        TokenError::Signing(msg) => error!(token = kind, %msg, "unexpected signing error"),
    }
}
