use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::Header;
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use warden_core::SubjectId;

use crate::{AccessClaims, CapabilitySet, RefreshClaims, SigningKeys, TokenError, TokenKind, TokenPair};

/// Configured token lifetimes. Access lifetime must be shorter than refresh,
/// and refresh may not exceed ten years.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn new(access: Duration, refresh: Duration) -> Option<Self> {
        if access <= Duration::zero() || refresh <= access || refresh > Self::max_refresh() {
            return None;
        }
        Some(Self { access, refresh })
    }

    pub fn max_refresh() -> Duration {
        Duration::days(3650)
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::hours(720),
        }
    }
}

/// Mints signed access and refresh tokens.
///
/// Has no side effects: persisting the refresh token is the caller's job.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: Arc<SigningKeys>,
    issuer: String,
    lifetimes: TokenLifetimes,
}

impl TokenIssuer {
    pub fn new(keys: Arc<SigningKeys>, issuer: impl Into<String>, lifetimes: TokenLifetimes) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            lifetimes,
        }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    #[instrument(skip_all, fields(subject = %subject), err)]
    pub fn issue(
        &self,
        subject: SubjectId,
        capabilities: CapabilitySet,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let iat = now.timestamp();
        let access_exp = expiry(now, self.lifetimes.access)?;
        let refresh_exp = expiry(now, self.lifetimes.refresh)?;

        let access = AccessClaims {
            sub: subject,
            iss: self.issuer.clone(),
            caps: capabilities,
            iat,
            exp: access_exp,
            jti: Uuid::now_v7(),
            typ: TokenKind::Access,
        };

        let refresh = RefreshClaims {
            sub: subject,
            iss: self.issuer.clone(),
            iat,
            exp: refresh_exp,
            jti: Uuid::now_v7(),
            typ: TokenKind::Refresh,
        };

        Ok(TokenPair {
            access: self.sign(&access)?,
            refresh: self.sign(&refresh)?,
        })
    }

    fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(self.keys.algorithm()), claims, self.keys.encoding())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

fn expiry(now: DateTime<Utc>, lifetime: Duration) -> Result<i64, TokenError> {
    now.checked_add_signed(lifetime)
        .map(|at| at.timestamp())
        .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetimes_require_access_shorter_than_refresh() {
        assert!(TokenLifetimes::new(Duration::minutes(15), Duration::hours(1)).is_some());
        assert!(TokenLifetimes::new(Duration::hours(1), Duration::hours(1)).is_none());
        assert!(TokenLifetimes::new(Duration::zero(), Duration::hours(1)).is_none());
    }

    #[test]
    fn lifetimes_cap_refresh_duration() {
        let max = TokenLifetimes::max_refresh();
        assert!(TokenLifetimes::new(Duration::minutes(15), max).is_some());
        assert!(TokenLifetimes::new(Duration::minutes(15), max + Duration::seconds(1)).is_none());
        assert!(TokenLifetimes::new(Duration::minutes(15), Duration::hours(3_000_000_000)).is_none());
    }

    #[test]
    fn unrepresentable_expiry_is_an_error_not_a_panic() {
        let keys = Arc::new(SigningKeys::hs256("secret").unwrap());
        let lifetimes = TokenLifetimes {
            access: Duration::minutes(15),
            refresh: Duration::hours(3_000_000_000),
        };
        let issuer = TokenIssuer::new(keys, "warden", lifetimes);

        let err = issuer
            .issue(SubjectId::new(), CapabilitySet::new(), Utc::now())
            .unwrap_err();
        assert!(matches!(err, TokenError::Signing(_)));
    }

    #[test]
    fn consecutive_issues_never_collide() {
        let keys = Arc::new(SigningKeys::hs256("secret").unwrap());
        let issuer = TokenIssuer::new(keys, "warden", TokenLifetimes::default());
        let now = Utc::now();
        let subject = SubjectId::new();

        let a = issuer.issue(subject, CapabilitySet::new(), now).unwrap();
        let b = issuer.issue(subject, CapabilitySet::new(), now).unwrap();
        assert_ne!(a.access, b.access);
        assert_ne!(a.refresh, b.refresh);
        assert_ne!(a.access, a.refresh);
    }
}
