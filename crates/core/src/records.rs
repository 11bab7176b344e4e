//! Signed record kinds and their canonical digests.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{ENTRY_TYPE_TAG, ROOT_TYPE_TAG};
use crate::hashing::{Hash, Hasher};

/// A record that can be signed.
///
/// The digest never includes the type tag; the tag is appended to the digest
/// only when signing, so the same digest signed under two tags yields two
/// unrelated signatures.
pub trait Signable {
    /// Stable, versioned identifier of the record layout.
    const TYPE_TAG: &'static str;

    /// Canonical digest of the record.
    fn hash(&self) -> Hash;
}

/// The authoritative key-binding record for a name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entry {
    /// The name this entry binds, e.g. `email:alice@example.com`.
    pub name: String,
    /// Key slot name to key token.
    #[serde(default, deserialize_with = "null_as_default")]
    pub keys: BTreeMap<String, String>,
    /// Unix seconds at which the entry was last updated.
    pub timestamp: u64,
    /// Whether the entry is in its recovery window.
    #[serde(default)]
    pub in_recovery: bool,
}

impl Signable for Entry {
    const TYPE_TAG: &'static str = ENTRY_TYPE_TAG;

    fn hash(&self) -> Hash {
        let mut hasher = Hasher::new();
        hasher.write_string(&self.name);
        hasher.write_u64(self.keys.len() as u64);
        // BTreeMap iterates in byte-wise ascending key order.
        for (name, key) in &self.keys {
            hasher.write_string(name);
            hasher.write_string(key);
        }
        hasher.write_u64(self.timestamp);
        hasher.write_bool(self.in_recovery);
        hasher.sum()
    }
}

/// Read a missing or `null` field as the type's default.
///
/// Servers encode an empty map as `null`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Digest of an optional entry; an absent entry hashes to [`Hash::EMPTY`].
pub fn entry_hash(entry: Option<&Entry>) -> Hash {
    entry.map_or(Hash::EMPTY, Signable::hash)
}

/// A commitment to the whole trie at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Root {
    /// Root digest of the trie.
    pub root_hash: Hash,
    /// Unix seconds at which the root was signed.
    pub timestamp: u64,
}

impl Signable for Root {
    const TYPE_TAG: &'static str = ROOT_TYPE_TAG;

    fn hash(&self) -> Hash {
        let mut hasher = Hasher::new();
        hasher.write_bytes(self.root_hash.as_bytes());
        hasher.write_u64(self.timestamp);
        hasher.sum()
    }
}
