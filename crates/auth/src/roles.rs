use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Capability, CapabilitySet};

/// Role assigned to a subject.
///
/// The role set is closed; capability resolution goes through [`resolve`] and
/// fails closed for anything outside it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Moderator,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Moderator, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// Capabilities granted by this role.
    pub fn capabilities(&self) -> CapabilitySet {
        match self {
            Role::Admin => CapabilitySet::from([
                Capability::ProductCreate,
                Capability::ProductUpdate,
                Capability::ProductDelete,
            ]),
            Role::Moderator => {
                CapabilitySet::from([Capability::ProductCreate, Capability::ProductUpdate])
            }
            Role::User => CapabilitySet::from([Capability::ProductCreate]),
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("role '{0}' does not exist")]
    UnknownRole(String),
}

impl core::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| RoleError::UnknownRole(s.to_string()))
    }
}

/// Resolve a stored role name into its capability set.
///
/// - No IO
/// - Unknown roles are an error, never an empty set
pub fn resolve(role: &str) -> Result<CapabilitySet, RoleError> {
    let role: Role = role.parse()?;
    Ok(role.capabilities())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_roles_resolve_to_fixed_non_empty_sets() {
        let admin = resolve("admin").unwrap();
        assert_eq!(admin.len(), 3);
        assert!(admin.contains(Capability::ProductDelete));

        let moderator = resolve("moderator").unwrap();
        assert!(moderator.contains(Capability::ProductUpdate));
        assert!(!moderator.contains(Capability::ProductDelete));

        let user = resolve("user").unwrap();
        assert_eq!(user, CapabilitySet::from([Capability::ProductCreate]));

        for role in Role::ALL {
            let first = resolve(role.as_str()).unwrap();
            assert!(!first.is_empty());
            assert_eq!(first, resolve(role.as_str()).unwrap());
        }
    }

    #[test]
    fn unknown_role_is_an_error_not_an_empty_set() {
        assert_eq!(
            resolve("superuser"),
            Err(RoleError::UnknownRole("superuser".to_string()))
        );
        // Case matters: stored role names are exact.
        assert!(resolve("Admin").is_err());
        assert!(resolve("").is_err());
    }

    proptest! {
        #[test]
        fn arbitrary_strings_outside_the_table_fail(name in "\\PC*") {
            prop_assume!(Role::ALL.iter().all(|r| r.as_str() != name));
            prop_assert_eq!(resolve(&name), Err(RoleError::UnknownRole(name.clone())));
        }
    }
}
