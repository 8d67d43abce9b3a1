use warden_auth::{AccessClaims, CapabilitySet};
use warden_core::SubjectId;

/// Authenticated subject for a request.
///
/// Built from verified access claims; capabilities are the snapshot taken
/// when the token was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectContext {
    claims: AccessClaims,
}

impl SubjectContext {
    pub fn new(claims: AccessClaims) -> Self {
        Self { claims }
    }

    pub fn subject_id(&self) -> SubjectId {
        self.claims.sub
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.claims.caps
    }

    pub fn claims(&self) -> &AccessClaims {
        &self.claims
    }
}
