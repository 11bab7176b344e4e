//! keytree lookup verifier.
//!
//! Verifies:
//! - that each audit path folds to the root its signer committed to
//! - that each signed root is fresh and carries a valid signature
//! - that enough trusted signers took part
//!
//! The check is a pure function of the response, the trust configuration
//! and the caller's clock; it performs no I/O.

#![warn(missing_docs)]

use std::collections::{BTreeMap, BTreeSet};

use keytree_core::{
    entry_hash, hash_string, signing, Entry, Hash, PrivateKey, PublicKey, Root, Signature,
};
use keytree_trie::TrieLookup;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub mod error;
pub mod trust;
pub mod vectors;

pub use error::{Result, VerificationError};
pub use trust::TrustConfig;
pub use vectors::generate_vectors;

/// A root plus one server's signature over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedRoot {
    /// The signed commitment.
    pub root: Root,
    /// Signature over the root digest and the root type tag.
    pub signature: Signature,
}

impl SignedRoot {
    /// Sign `root` with `key`.
    pub fn sign(key: &PrivateKey, root: Root) -> Self {
        Self {
            signature: signing::sign(key, &root),
            root,
        }
    }

    /// Whether the signature verifies under `key`.
    pub fn verify(&self, key: &PublicKey) -> bool {
        signing::verify(key, &self.root, &self.signature)
    }
}

/// One server's audit path together with its signed root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SignedTrieLookup {
    /// Audit path for the queried name.
    pub trie_lookup: TrieLookup,
    /// The root the path must fold to.
    pub signed_root: SignedRoot,
}

/// A full lookup response as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lookup {
    /// The entry for the name, or `None` if the response proves absence.
    #[serde(default)]
    pub entry: Option<Entry>,
    /// Per-signer proofs keyed by `ed25519-pub(...)` token.
    #[serde(default, deserialize_with = "keytree_core::records::null_as_default")]
    pub signed_trie_lookups: BTreeMap<String, SignedTrieLookup>,
}

/// Accept or reject a lookup response for `name`.
///
/// Returns the entry on a verified inclusion proof and `None` on a verified
/// absence proof. `now` is the caller's clock in Unix seconds.
///
/// Every signer present in the response must pass; a single bad signer
/// rejects the response even if enough others are valid. Signers outside
/// `trust` are checked but do not count toward the threshold.
pub fn verify_lookup(
    lookup: &Lookup,
    name: &str,
    trust: &TrustConfig,
    now: u64,
) -> Result<Option<Entry>> {
    let key = hash_string(name);
    let value = entry_hash(lookup.entry.as_ref());
    let cutoff = now.saturating_sub(trust.max_signature_age_secs());

    let mut signers = BTreeSet::new();
    for (token, signed) in &lookup.signed_trie_lookups {
        match check_signer(token, signed, &key, &value, cutoff) {
            Ok(public_key) => {
                debug!("Signer {} verified for {}", token, name);
                signers.insert(public_key);
            }
            Err(e) => {
                warn!("Rejecting lookup for {}: {}", name, e);
                return Err(e);
            }
        }
    }

    let valid = trust.keys().intersection(&signers).count();
    if valid < trust.threshold() {
        let e = VerificationError::InsufficientSignatures {
            valid,
            threshold: trust.threshold(),
        };
        warn!("Rejecting lookup for {}: {}", name, e);
        return Err(e);
    }

    info!(
        "Verified lookup for {} ({} of {} trusted signers, {})",
        name,
        valid,
        trust.keys().len(),
        if lookup.entry.is_some() { "present" } else { "absent" }
    );
    Ok(lookup.entry.clone())
}

fn check_signer(
    token: &str,
    signed: &SignedTrieLookup,
    key: &Hash,
    value: &Hash,
    cutoff: u64,
) -> Result<PublicKey> {
    let public_key: PublicKey = token.parse()?;
    let root = &signed.signed_root.root;

    let computed = signed.trie_lookup.compute_root(key, value);
    if computed != root.root_hash {
        return Err(VerificationError::BadRootHash {
            key: token.to_string(),
            computed,
            signed: root.root_hash,
        });
    }

    if root.timestamp < cutoff {
        return Err(VerificationError::StaleSignature {
            key: token.to_string(),
            timestamp: root.timestamp,
            cutoff,
        });
    }

    if !signed.signed_root.verify(&public_key) {
        return Err(VerificationError::BadSignature {
            key: token.to_string(),
        });
    }

    Ok(public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytree_trie::ReferenceTrie;

    const NOW: u64 = 1_700_000_000;

    fn signer(seed: u8) -> PrivateKey {
        PrivateKey::from_seed(&[seed; 32])
    }

    fn entry() -> Entry {
        let mut keys = BTreeMap::new();
        keys.insert("ssh".to_string(), "ssh-ed25519 AAAA".to_string());
        Entry {
            name: "email:alice@example.com".to_string(),
            keys,
            timestamp: NOW - 3600,
            in_recovery: false,
        }
    }

    fn single_signer_lookup(key: &PrivateKey) -> Lookup {
        let entry = entry();
        let mut trie = ReferenceTrie::new();
        trie.insert(hash_string(&entry.name), entry_hash(Some(&entry)));
        let (path, _) = trie.lookup(&hash_string(&entry.name));
        let root = Root {
            root_hash: trie.root(),
            timestamp: NOW,
        };

        let mut signed_trie_lookups = BTreeMap::new();
        signed_trie_lookups.insert(
            key.public_key().to_token(),
            SignedTrieLookup {
                trie_lookup: path,
                signed_root: SignedRoot::sign(key, root),
            },
        );
        Lookup {
            entry: Some(entry),
            signed_trie_lookups,
        }
    }

    #[test]
    fn test_single_trusted_signer_accepts() {
        let key = signer(1);
        let trust = TrustConfig::new([key.public_key()], 1).unwrap();
        let lookup = single_signer_lookup(&key);
        let verified = verify_lookup(&lookup, "email:alice@example.com", &trust, NOW).unwrap();
        assert_eq!(verified, Some(entry()));
    }

    #[test]
    fn test_wrong_name_is_bad_root_hash() {
        let key = signer(1);
        let trust = TrustConfig::new([key.public_key()], 1).unwrap();
        let lookup = single_signer_lookup(&key);
        assert!(matches!(
            verify_lookup(&lookup, "email:mallory@example.com", &trust, NOW),
            Err(VerificationError::BadRootHash { .. })
        ));
    }

    #[test]
    fn test_malformed_signer_token_is_format_error() {
        let key = signer(1);
        let trust = TrustConfig::new([key.public_key()], 1).unwrap();
        let mut lookup = single_signer_lookup(&key);
        let signed = lookup.signed_trie_lookups.values().next().cloned().unwrap();
        lookup
            .signed_trie_lookups
            .insert("ed25519-pub(oops)".to_string(), signed);
        assert!(matches!(
            verify_lookup(&lookup, "email:alice@example.com", &trust, NOW),
            Err(VerificationError::Format(_))
        ));
    }

    #[test]
    fn test_null_signed_trie_lookups_read_as_empty() {
        let lookup: Lookup =
            serde_json::from_str(r#"{"Entry":null,"SignedTrieLookups":null}"#).unwrap();
        assert!(lookup.signed_trie_lookups.is_empty());

        let trust = TrustConfig::new([signer(1).public_key()], 1).unwrap();
        assert_eq!(
            verify_lookup(&lookup, "email:alice@example.com", &trust, NOW),
            Err(VerificationError::InsufficientSignatures {
                valid: 0,
                threshold: 1
            })
        );
    }

    #[test]
    fn test_signed_root_verify() {
        let key = signer(3);
        let signed = SignedRoot::sign(
            &key,
            Root {
                root_hash: hash_string("r"),
                timestamp: 9,
            },
        );
        assert!(signed.verify(&key.public_key()));
        assert!(!signed.verify(&signer(4).public_key()));
    }
}
