//! Audit paths and the fold that recomputes a root from them.

use std::collections::BTreeMap;
use std::fmt;

use keytree_core::{combine_hashes, Hash, HASH_BITS};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TrieError};

/// Sibling digests along one audit path, indexed by trie depth.
///
/// Only non-empty depths are stored; every other depth reads as
/// [`Hash::EMPTY`].
///
/// On the wire this is a JSON object from decimal depth to digest token,
/// with empty depths omitted. A JSON array of `token | null` indexed by depth
/// is accepted on input as well, and `null` reads as an empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditHashes(BTreeMap<usize, Hash>);

impl AuditHashes {
    /// An audit path with every sibling empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sibling at `depth`, or [`Hash::EMPTY`] if none is stored.
    pub fn get(&self, depth: usize) -> Hash {
        self.0.get(&depth).copied().unwrap_or(Hash::EMPTY)
    }

    /// Store the sibling at `depth`; storing [`Hash::EMPTY`] clears it.
    pub fn set(&mut self, depth: usize, hash: Hash) -> Result<()> {
        if depth >= HASH_BITS {
            return Err(TrieError::DepthOutOfRange {
                depth,
                max: HASH_BITS,
            });
        }
        if hash.is_empty() {
            self.0.remove(&depth);
        } else {
            self.0.insert(depth, hash);
        }
        Ok(())
    }

    /// Store a sibling met while walking a trie, where depths are bounded
    /// by the key width.
    #[cfg(any(test, feature = "test_utils"))]
    pub(crate) fn record(&mut self, depth: usize, hash: Hash) {
        debug_assert!(depth < HASH_BITS);
        if hash.is_empty() {
            self.0.remove(&depth);
        } else {
            self.0.insert(depth, hash);
        }
    }

    /// Number of non-empty depths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether every depth is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty `(depth, sibling)` pairs in ascending depth order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Hash)> + '_ {
        self.0.iter().map(|(depth, hash)| (*depth, hash))
    }
}

impl Serialize for AuditHashes {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(depth, hash)| (depth.to_string(), hash)))
    }
}

struct AuditHashesVisitor;

impl<'de> Visitor<'de> for AuditHashesVisitor {
    type Value = AuditHashes;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from depth to digest or an array of digests")
    }

    fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(AuditHashes::new())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut hashes = AuditHashes::new();
        while let Some((depth, hash)) = map.next_entry::<String, Option<Hash>>()? {
            let depth: usize = depth
                .parse()
                .map_err(|_| serde::de::Error::custom(TrieError::InvalidDepth(depth.clone())))?;
            hashes
                .set(depth, hash.unwrap_or(Hash::EMPTY))
                .map_err(serde::de::Error::custom)?;
        }
        Ok(hashes)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut hashes = AuditHashes::new();
        let mut depth = 0;
        while let Some(hash) = seq.next_element::<Option<Hash>>()? {
            if let Some(hash) = hash {
                hashes.set(depth, hash).map_err(serde::de::Error::custom)?;
            }
            depth += 1;
        }
        Ok(hashes)
    }
}

impl<'de> Deserialize<'de> for AuditHashes {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AuditHashesVisitor)
    }
}

/// An audit path for one query key.
///
/// `leaf_key` is the key of the leaf the path actually ends at; it equals
/// the query key unless the path proves absence by ending at some other
/// leaf, or the deepest sibling is itself a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrieLookup {
    /// Key of the leaf at the end of the path.
    pub leaf_key: Hash,
    /// Sibling digests by depth.
    #[serde(default)]
    pub hashes: AuditHashes,
}

impl TrieLookup {
    /// An empty path for `key`: proves absence from the empty trie.
    pub fn new(key: Hash) -> Self {
        Self {
            leaf_key: key,
            hashes: AuditHashes::new(),
        }
    }

    /// Root digest this path commits to for `key` holding `value`.
    ///
    /// Pass [`Hash::EMPTY`] as `value` to check that `key` is absent. Folds
    /// from the deepest level to the root. While the running digest is a lone
    /// leaf, empty siblings leave it unchanged, so a leaf costs the same at
    /// every depth it could float to.
    pub fn compute_root(&self, key: &Hash, value: &Hash) -> Hash {
        let (mut current, mut is_leaf) = if value.is_empty() {
            (Hash::EMPTY, false)
        } else {
            (combine_hashes(key, value), true)
        };

        // HASH_BITS when the path ends at `key` itself; never matched below.
        let leaf_depth = key.first_difference(&self.leaf_key);

        for depth in (0..HASH_BITS).rev() {
            let mut sibling = self.hashes.get(depth);

            if depth == leaf_depth {
                sibling = combine_hashes(&self.leaf_key, &sibling);
                if current.is_empty() {
                    current = sibling;
                    is_leaf = true;
                    continue;
                }
            }

            if sibling.is_empty() && is_leaf {
                continue;
            }

            current = if key.bit(depth) == 0 {
                combine_hashes(&current, &sibling)
            } else {
                combine_hashes(&sibling, &current)
            };
            is_leaf = false;
        }

        current
    }

    /// Whether this path commits `key` to `value` under `root`.
    pub fn verify(&self, key: &Hash, value: &Hash, root: &Hash) -> bool {
        self.compute_root(key, value) == *root
    }
}
