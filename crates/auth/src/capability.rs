//! Capability vocabulary.
//!
//! Capabilities are drawn from a closed vocabulary per resource kind. The wire
//! form is `"<resource>:<action>"` (e.g. `"product:create"`), which is what
//! lands in access-token claims.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single named permission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "product:create")]
    ProductCreate,
    #[serde(rename = "product:update")]
    ProductUpdate,
    #[serde(rename = "product:delete")]
    ProductDelete,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::ProductCreate,
        Capability::ProductUpdate,
        Capability::ProductDelete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ProductCreate => "product:create",
            Capability::ProductUpdate => "product:update",
            Capability::ProductDelete => "product:delete",
        }
    }
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown capability '{0}'")]
pub struct UnknownCapability(pub String);

impl core::str::FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCapability(s.to_string()))
    }
}

/// An ordered set of capabilities.
///
/// Ordered so that serialized claims are deterministic for a given role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Capability; N]> for CapabilitySet {
    fn from(value: [Capability; N]) -> Self {
        value.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_parse_back() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>(), Ok(cap));
        }
        assert!("product:archive".parse::<Capability>().is_err());
    }

    #[test]
    fn set_serializes_in_stable_order() {
        let set = CapabilitySet::from([Capability::ProductDelete, Capability::ProductCreate]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["product:create","product:delete"]"#);
    }
}
