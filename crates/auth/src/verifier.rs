use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{errors::ErrorKind, Validation};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::claims::{is_expired, TokenClaims};
use crate::{AccessClaims, RefreshClaims, SigningKeys};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl TokenError {
    /// Whether this is a structural/cryptographic rejection.
    ///
    /// Callers outside the process see both as the same "invalid token".
    pub fn is_invalid(&self) -> bool {
        matches!(self, TokenError::Malformed | TokenError::SignatureInvalid)
    }

    fn from_jwt(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::SignatureInvalid,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Validates signed tokens and recovers their claims.
///
/// Stateless: never consults the credential store.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    keys: Arc<SigningKeys>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: Arc<SigningKeys>, issuer: &str) -> Self {
        let mut validation = Validation::new(keys.algorithm());
        // Expiry is enforced against the caller's `now` with an inclusive boundary.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[issuer]);

        Self { keys, validation }
    }

    pub fn verify_access(&self, raw: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode(raw)?;
        check_expiry(&claims, now)?;
        Ok(claims)
    }

    pub fn verify_refresh(&self, raw: &str, now: DateTime<Utc>) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.decode(raw)?;
        check_expiry(&claims, now)?;
        Ok(claims)
    }

    /// Signature and structure are enforced; expiration is not.
    ///
    /// Used by renewal, which needs the subject of an access token that may
    /// already have lapsed.
    pub fn decode_access_ignoring_expiry(&self, raw: &str) -> Result<AccessClaims, TokenError> {
        self.decode(raw)
    }

    fn decode<C>(&self, raw: &str) -> Result<C, TokenError>
    where
        C: DeserializeOwned + TokenClaims,
    {
        let data = jsonwebtoken::decode::<C>(raw, self.keys.decoding(), &self.validation)
            .map_err(TokenError::from_jwt)?;

        if data.claims.kind() != C::KIND {
            return Err(TokenError::Malformed);
        }
        Ok(data.claims)
    }
}

fn check_expiry<C: TokenClaims>(claims: &C, now: DateTime<Utc>) -> Result<(), TokenError> {
    if is_expired(claims.expires_at_unix(), now) {
        return Err(TokenError::Expired);
    }
    Ok(())
}
