//! Opaque identifiers for accounts and assets.
//!
//! The source identifies both with the settlement runtime's native address
//! type. Off-chain there is no such runtime, so both become plain newtypes
//! around an owned string ticker/handle; equality is the only structure a
//! caller may assume (spec.md GLOSSARY).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<String>> From<T> for AccountId {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Identifies one fungible underlying asset and its reserve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<String>> From<T> for AssetId {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

/// Upper bound on the number of reserves the global reserve list may hold.
/// Preserves the source's `MAX_RESERVES` cap (spec.md REDESIGN FLAGS),
/// which bounds aggregator traversal cost.
pub const MAX_RESERVES: usize = 128;
