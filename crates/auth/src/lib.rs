//! `warden-auth`: session and authorization boundary.
//!
//! This crate is decoupled from HTTP and storage: the credential
//! store, user directory and password primitive are ports implemented
//! elsewhere.

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod issuer;
pub mod keys;
pub mod password;
pub mod roles;
pub mod session;
pub mod store;
pub mod subject;
pub mod verifier;

pub use authorize::{authorize, AuthzError};
pub use capability::{Capability, CapabilitySet, UnknownCapability};
pub use claims::{AccessClaims, RefreshClaims, TokenKind, TokenPair};
pub use issuer::{TokenIssuer, TokenLifetimes};
pub use keys::{KeyError, SigningKeys};
pub use password::{PasswordError, PasswordScheme};
pub use roles::{resolve, Role, RoleError};
pub use session::{AuthError, SessionConfig, SessionService};
pub use store::{CredentialStore, StoreError};
pub use subject::{DirectoryError, Subject, SubjectStatus, UserDirectory};
pub use verifier::{TokenError, TokenVerifier};
