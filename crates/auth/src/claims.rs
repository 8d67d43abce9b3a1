use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_core::SubjectId;

use crate::CapabilitySet;

/// Discriminates the two token kinds so one can never stand in for the other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by an access token.
///
/// The capability set is a snapshot taken at issuance; role changes only take
/// effect on the next issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject identifier.
    pub sub: SubjectId,

    /// Issuer name.
    pub iss: String,

    /// Capabilities granted at issuance.
    pub caps: CapabilitySet,

    /// Issued-at (unix seconds).
    pub iat: i64,

    /// Expiration (unix seconds).
    pub exp: i64,

    /// Unique token id.
    pub jti: Uuid,

    pub typ: TokenKind,
}

/// Claims carried by a refresh token. No capabilities: those are re-resolved
/// from the subject's current role when the token is redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: SubjectId,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: Uuid,
    pub typ: TokenKind,
}

/// Claims common to both token kinds.
pub trait TokenClaims {
    const KIND: TokenKind;

    fn kind(&self) -> TokenKind;
    fn subject(&self) -> SubjectId;
    fn expires_at_unix(&self) -> i64;

    fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at_unix(), 0)
    }
}

impl TokenClaims for AccessClaims {
    const KIND: TokenKind = TokenKind::Access;

    fn kind(&self) -> TokenKind {
        self.typ
    }

    fn subject(&self) -> SubjectId {
        self.sub
    }

    fn expires_at_unix(&self) -> i64 {
        self.exp
    }
}

impl TokenClaims for RefreshClaims {
    const KIND: TokenKind = TokenKind::Refresh;

    fn kind(&self) -> TokenKind {
        self.typ
    }

    fn subject(&self) -> SubjectId {
        self.sub
    }

    fn expires_at_unix(&self) -> i64 {
        self.exp
    }
}

/// Freshly issued access + refresh tokens. Transient; never stored as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// A token is expired once `now` reaches its expiration instant (inclusive).
pub fn is_expired(exp: i64, now: DateTime<Utc>) -> bool {
    now.timestamp() >= exp
}
