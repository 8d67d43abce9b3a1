use thiserror::Error;

use crate::{AccessClaims, Capability};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing capability '{0}'")]
    Forbidden(Capability),
}

/// Check a capability against verified access-token claims.
///
/// - No IO
/// - No panics
/// - Consults only the frozen capability snapshot in the token
pub fn authorize(claims: &AccessClaims, required: Capability) -> Result<(), AuthzError> {
    if claims.caps.contains(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required))
    }
}
