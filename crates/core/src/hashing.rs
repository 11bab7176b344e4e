//! Canonical hashing for keytree.
//!
//! All digests are SHA-512. Records are hashed by writing their fields into a
//! [`Hasher`] in a fixed order; variable-length fields are length-prefixed so
//! field boundaries can never be ambiguous.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};

use crate::codec;
use crate::error::FormatError;

/// Digest width in bytes.
pub const HASH_LEN: usize = 64;

/// Digest width in bits; also the depth of the trie.
pub const HASH_BITS: usize = HASH_LEN * 8;

/// A fixed-width SHA-512 digest.
///
/// Serializes as a bare codec token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// The all-zero digest: "no subtree here".
    pub const EMPTY: Hash = Hash([0u8; HASH_LEN]);

    /// Wrap raw digest bytes.
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }

    /// Copy a digest out of a slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FormatError> {
        let array = <[u8; HASH_LEN]>::try_from(bytes).map_err(|_| FormatError::WrongSize {
            what: "hash",
            expected: HASH_LEN,
            actual: bytes.len(),
        })?;
        Ok(Hash(array))
    }

    /// Raw digest bytes.
    pub const fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Whether this is [`Hash::EMPTY`].
    pub fn is_empty(&self) -> bool {
        *self == Hash::EMPTY
    }

    /// Bit `index`, where bit 0 is the low bit of byte 0.
    ///
    /// # Panics
    ///
    /// Panics if `index >= HASH_BITS`.
    pub fn bit(&self, index: usize) -> u8 {
        (self.0[index / 8] >> (index % 8)) & 1
    }

    /// Set bit `index` to the low bit of `value`.
    pub fn set_bit(&mut self, index: usize, value: u8) {
        let mask = 1u8 << (index % 8);
        if value & 1 == 0 {
            self.0[index / 8] &= !mask;
        } else {
            self.0[index / 8] |= mask;
        }
    }

    /// Index of the first bit at which the two digests differ, scanning
    /// from bit 0 upward, or [`HASH_BITS`] if they are identical.
    pub fn first_difference(&self, other: &Hash) -> usize {
        (0..HASH_BITS)
            .find(|&index| self.bit(index) != other.bit(index))
            .unwrap_or(HASH_BITS)
    }
}

impl Default for Hash {
    fn default() -> Self {
        Hash::EMPTY
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(&self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

impl FromStr for Hash {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hash::from_slice(&codec::decode(s)?)
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

/// Append-only accumulator producing one digest per logical record.
///
/// The order of writes is part of the hashing contract.
#[derive(Clone, Default)]
pub struct Hasher {
    inner: Sha512,
}

impl Hasher {
    /// Create an empty hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write raw bytes with no framing.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Write an 8-byte big-endian integer.
    pub fn write_u64(&mut self, value: u64) {
        self.inner.update(value.to_be_bytes());
    }

    /// Write a single `0` or `1` byte.
    pub fn write_bool(&mut self, value: bool) {
        self.inner.update([u8::from(value)]);
    }

    /// Write the UTF-8 byte length as a `u64`, then the bytes.
    pub fn write_string(&mut self, value: &str) {
        self.write_u64(value.len() as u64);
        self.write_bytes(value.as_bytes());
    }

    /// Digest of everything written so far.
    pub fn sum(self) -> Hash {
        let mut out = [0u8; HASH_LEN];
        out.copy_from_slice(&self.inner.finalize());
        Hash(out)
    }
}

/// Digest of the raw UTF-8 bytes of `s`, with no length prefix.
///
/// This is how names are turned into trie keys.
///
/// # Example
///
/// ```
/// use keytree_core::hashing::hash_string;
///
/// let key = hash_string("email:alice@example.com");
/// assert!(!key.is_empty());
/// ```
pub fn hash_string(s: &str) -> Hash {
    let mut hasher = Hasher::new();
    hasher.write_bytes(s.as_bytes());
    hasher.sum()
}

/// Combine two child digests into their parent.
///
/// Two empty children collapse to [`Hash::EMPTY`] so untouched subtrees
/// stay empty at every depth.
pub fn combine_hashes(a: &Hash, b: &Hash) -> Hash {
    if a.is_empty() && b.is_empty() {
        return Hash::EMPTY;
    }

    let mut hasher = Hasher::new();
    hasher.write_bytes(a.as_bytes());
    hasher.write_bytes(b.as_bytes());
    hasher.sum()
}
