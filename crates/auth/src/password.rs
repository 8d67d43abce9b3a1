use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(pub String);

/// Opaque password hashing primitive.
pub trait PasswordScheme: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// `false` for a mismatch and for an unparseable hash alike.
    fn verify(&self, hash: &str, candidate: &str) -> bool;
}

impl<P> PasswordScheme for Arc<P>
where
    P: PasswordScheme + ?Sized,
{
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        (**self).hash(password)
    }

    fn verify(&self, hash: &str, candidate: &str) -> bool {
        (**self).verify(hash, candidate)
    }
}
