//! API-side capability guard.
//!
//! Runs after the bearer middleware and before any state is touched.

use warden_auth::{AuthError, Capability, authorize};

use crate::app::errors;
use crate::context::SubjectContext;

/// Require `capability` in the request's access-token snapshot.
pub fn require_capability(
    subject: &SubjectContext,
    capability: Capability,
) -> Result<(), axum::response::Response> {
    authorize(subject.claims(), capability).map_err(|e| {
        tracing::debug!(subject = %subject.subject_id(), %capability, "capability check failed");
        errors::auth_error_to_response(&AuthError::from(e))
    })
}
