//! Typed key material and its token forms.
//!
//! Every value renders as `<tag>(<token>)` and parses back byte-exact. A
//! wrong tag, a broken wrapper or a wrong decoded length is a
//! [`FormatError`].

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::{SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::codec::{
    self, TAG_BOX_PRIVATE, TAG_BOX_PUBLIC, TAG_BOX_SEALED, TAG_ED25519_PRIVATE,
    TAG_ED25519_PUBLIC, TAG_ED25519_SIGNATURE,
};
use crate::error::FormatError;

/// Length of a box nonce at the front of a sealed box.
pub const BOX_NONCE_LEN: usize = 24;

macro_rules! token_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_token())
            }
        }

        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.to_token())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let token = String::deserialize(deserializer)?;
                token.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Ed25519 public key, `ed25519-pub(...)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Raw 32-byte key.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Parse raw key bytes; rejects encodings that are not curve points.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, FormatError> {
        VerifyingKey::from_bytes(bytes)
            .map(PublicKey)
            .map_err(|e| FormatError::InvalidKey {
                what: TAG_ED25519_PUBLIC,
                reason: e.to_string(),
            })
    }

    /// Token form.
    pub fn to_token(&self) -> String {
        codec::wrap(self.0.as_bytes(), TAG_ED25519_PUBLIC)
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(key: VerifyingKey) -> Self {
        PublicKey(key)
    }
}

impl std::hash::Hash for PublicKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.as_bytes().hash(state);
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.as_bytes().cmp(other.0.as_bytes())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl FromStr for PublicKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicKey::from_bytes(&codec::unwrap_fixed::<32>(s, TAG_ED25519_PUBLIC)?)
    }
}

token_serde!(PublicKey);

/// Ed25519 private key, `ed25519-priv(...)`.
///
/// The token carries 64 bytes: the 32-byte seed followed by the 32-byte
/// public key. Parsing checks that the two halves belong together.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Build from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        PrivateKey(SigningKey::from_bytes(seed))
    }

    /// Matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    /// Token form.
    pub fn to_token(&self) -> String {
        codec::wrap(&self.0.to_keypair_bytes(), TAG_ED25519_PRIVATE)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.0
    }
}

impl From<SigningKey> for PrivateKey {
    fn from(key: SigningKey) -> Self {
        PrivateKey(key)
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bytes() == other.0.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey")
            .field(&self.public_key())
            .finish()
    }
}

impl FromStr for PrivateKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = codec::unwrap_fixed::<64>(s, TAG_ED25519_PRIVATE)?;
        SigningKey::from_keypair_bytes(&bytes)
            .map(PrivateKey)
            .map_err(|e| FormatError::InvalidKey {
                what: TAG_ED25519_PRIVATE,
                reason: e.to_string(),
            })
    }
}

token_serde!(PrivateKey);

/// Detached Ed25519 signature, `ed25519-sig(...)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; 64]);

impl Signature {
    /// Wrap raw signature bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Signature(bytes)
    }

    /// Raw signature bytes.
    pub const fn to_bytes(&self) -> [u8; 64] {
        self.0
    }

    /// Token form.
    pub fn to_token(&self) -> String {
        codec::wrap(&self.0, TAG_ED25519_SIGNATURE)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_token())
    }
}

impl FromStr for Signature {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::unwrap_fixed::<64>(s, TAG_ED25519_SIGNATURE).map(Signature)
    }
}

token_serde!(Signature);

/// Curve25519 box public key, `box-pub(...)`.
///
/// Box material is carried for interchange only; nothing in verification
/// uses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxPublicKey([u8; 32]);

impl BoxPublicKey {
    /// Wrap raw key bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        BoxPublicKey(bytes)
    }

    /// Raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Token form.
    pub fn to_token(&self) -> String {
        codec::wrap(&self.0, TAG_BOX_PUBLIC)
    }
}

impl FromStr for BoxPublicKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::unwrap_fixed::<32>(s, TAG_BOX_PUBLIC).map(BoxPublicKey)
    }
}

token_serde!(BoxPublicKey);

/// Curve25519 box private key, `box-priv(...)`.
#[derive(Clone, PartialEq, Eq)]
pub struct BoxPrivateKey([u8; 32]);

impl BoxPrivateKey {
    /// Wrap raw key bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        BoxPrivateKey(bytes)
    }

    /// Raw key bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Token form.
    pub fn to_token(&self) -> String {
        codec::wrap(&self.0, TAG_BOX_PRIVATE)
    }
}

impl Drop for BoxPrivateKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for BoxPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxPrivateKey(..)")
    }
}

impl FromStr for BoxPrivateKey {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::unwrap_fixed::<32>(s, TAG_BOX_PRIVATE).map(BoxPrivateKey)
    }
}

token_serde!(BoxPrivateKey);

/// Sealed box, `box-box(...)`: a 24-byte nonce followed by ciphertext.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedBox(Vec<u8>);

impl SealedBox {
    /// Wrap nonce-prefixed ciphertext.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        if bytes.len() < BOX_NONCE_LEN {
            return Err(FormatError::WrongSize {
                what: TAG_BOX_SEALED,
                expected: BOX_NONCE_LEN,
                actual: bytes.len(),
            });
        }
        Ok(SealedBox(bytes))
    }

    /// The nonce.
    pub fn nonce(&self) -> &[u8] {
        &self.0[..BOX_NONCE_LEN]
    }

    /// The ciphertext after the nonce.
    pub fn ciphertext(&self) -> &[u8] {
        &self.0[BOX_NONCE_LEN..]
    }

    /// Token form.
    pub fn to_token(&self) -> String {
        codec::wrap(&self.0, TAG_BOX_SEALED)
    }
}

impl FromStr for SealedBox {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SealedBox::from_bytes(codec::unwrap(s, TAG_BOX_SEALED)?)
    }
}

token_serde!(SealedBox);

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> PrivateKey {
        PrivateKey::from_seed(&[0x22u8; 32])
    }

    #[test]
    fn test_public_key_token_round_trip() {
        let public = test_key().public_key();
        let token = public.to_token();
        assert!(token.starts_with("ed25519-pub("));
        assert_eq!(token.parse::<PublicKey>().unwrap(), public);
    }

    #[test]
    fn test_private_key_token_round_trip() {
        let private = test_key();
        let token = private.to_token();
        assert!(token.starts_with("ed25519-priv("));
        let parsed: PrivateKey = token.parse().unwrap();
        assert_eq!(parsed, private);
        assert_eq!(parsed.public_key(), private.public_key());
    }

    #[test]
    fn test_private_key_rejects_mismatched_halves() {
        let mut bytes = test_key().signing_key().to_keypair_bytes();
        let other = PrivateKey::from_seed(&[0x33u8; 32]).public_key();
        bytes[32..].copy_from_slice(&other.to_bytes());
        let token = codec::wrap(&bytes, TAG_ED25519_PRIVATE);
        assert!(matches!(
            token.parse::<PrivateKey>(),
            Err(FormatError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_tags_are_not_interchangeable() {
        let public = test_key().public_key().to_token();
        assert!(public.parse::<Signature>().is_err());
        assert!(public.parse::<PrivateKey>().is_err());
        assert!(public.parse::<BoxPublicKey>().is_err());

        let as_box = codec::wrap(&test_key().public_key().to_bytes(), TAG_BOX_PUBLIC);
        assert!(as_box.parse::<PublicKey>().is_err());
        assert!(as_box.parse::<BoxPublicKey>().is_ok());
    }

    #[test]
    fn test_signature_wrong_length() {
        let token = codec::wrap(&[1u8; 63], TAG_ED25519_SIGNATURE);
        assert!(matches!(
            token.parse::<Signature>(),
            Err(FormatError::WrongSize { expected: 64, actual: 63, .. })
        ));
    }

    #[test]
    fn test_sealed_box_requires_nonce() {
        let token = codec::wrap(&[0u8; 10], TAG_BOX_SEALED);
        assert!(token.parse::<SealedBox>().is_err());

        let mut bytes = vec![9u8; BOX_NONCE_LEN];
        bytes.extend_from_slice(b"ciphertext");
        let sealed: SealedBox = codec::wrap(&bytes, TAG_BOX_SEALED).parse().unwrap();
        assert_eq!(sealed.nonce(), &[9u8; BOX_NONCE_LEN]);
        assert_eq!(sealed.ciphertext(), b"ciphertext");
    }

    #[test]
    fn test_public_key_serde() {
        let public = test_key().public_key();
        let json = serde_json::to_string(&public).unwrap();
        assert_eq!(json, format!("\"{}\"", public.to_token()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, public);
    }
}
