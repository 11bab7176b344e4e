//! Deterministic vectors for cross-implementation checks.

use std::collections::BTreeMap;

use keytree_core::{
    codec, combine_hashes, entry_hash, hash_string, Entry, Hash, PrivateKey, Root, Signable,
};
use keytree_trie::{TrieError, TrieLookup};

use crate::{Lookup, SignedRoot, SignedTrieLookup};

/// Seed of the fixed signing key used in the vectors.
pub const VECTOR_KEY_SEED: [u8; 32] = [0x01; 32];

/// Root timestamp used in the vectors.
pub const VECTOR_TIMESTAMP: u64 = 1_450_000_000;

/// Name looked up in the vectors.
pub const VECTOR_NAME: &str = "email:alice@example.com";

fn vector_entry(name: &str, slot: &str, key: &str) -> Entry {
    let mut keys = BTreeMap::new();
    keys.insert(slot.to_string(), key.to_string());
    Entry {
        name: name.to_string(),
        keys,
        timestamp: VECTOR_TIMESTAMP - 600,
        in_recovery: false,
    }
}

/// Root of a trie holding exactly `a` and `b`, and the audit path for `a`.
///
/// Fails if the two keys are equal.
fn two_leaf_trie(a: (Hash, Hash), b: (Hash, Hash)) -> Result<(Hash, TrieLookup), TrieError> {
    let (a_key, a_value) = a;
    let (b_key, b_value) = b;
    let split = a_key.first_difference(&b_key);

    let mut path = TrieLookup::new(b_key);
    path.hashes.set(split, b_value)?;

    let a_leaf = combine_hashes(&a_key, &a_value);
    let b_leaf = combine_hashes(&b_key, &b_value);
    let mut node = if a_key.bit(split) == 0 {
        combine_hashes(&a_leaf, &b_leaf)
    } else {
        combine_hashes(&b_leaf, &a_leaf)
    };
    for depth in (0..split).rev() {
        node = if a_key.bit(depth) == 0 {
            combine_hashes(&node, &Hash::EMPTY)
        } else {
            combine_hashes(&Hash::EMPTY, &node)
        };
    }

    Ok((node, path))
}

/// A complete, verifiable lookup for [`VECTOR_NAME`] signed by the vector
/// key at [`VECTOR_TIMESTAMP`].
pub fn vector_lookup() -> Result<Lookup, TrieError> {
    let key = PrivateKey::from_seed(&VECTOR_KEY_SEED);
    let alice = vector_entry(VECTOR_NAME, "ssh", "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5");
    let bob = vector_entry("email:bob@example.com", "pgp", "4F2A 91C0");

    let (root_hash, path) = two_leaf_trie(
        (hash_string(&alice.name), entry_hash(Some(&alice))),
        (hash_string(&bob.name), entry_hash(Some(&bob))),
    )?;
    let root = Root {
        root_hash,
        timestamp: VECTOR_TIMESTAMP,
    };

    let mut signed_trie_lookups = BTreeMap::new();
    signed_trie_lookups.insert(
        key.public_key().to_token(),
        SignedTrieLookup {
            trie_lookup: path,
            signed_root: SignedRoot::sign(&key, root),
        },
    );
    Ok(Lookup {
        entry: Some(alice),
        signed_trie_lookups,
    })
}

/// Generate the vector bundle as JSON.
pub fn generate_vectors() -> Result<serde_json::Value, TrieError> {
    let key = PrivateKey::from_seed(&VECTOR_KEY_SEED);
    let lookup = vector_lookup()?;
    let name_key = hash_string(VECTOR_NAME);
    let entry_digest = entry_hash(lookup.entry.as_ref());

    let signed = lookup.signed_trie_lookups.values().next();
    let root = signed.map(|signed| signed.signed_root.root);
    let root_digest = root.as_ref().map(Signable::hash);

    Ok(serde_json::json!({
        "version": "keytree-0.4",
        "codec": {
            "bytes": hex::encode([1u8, 2, 3]),
            "wrapped": codec::wrap(&[1, 2, 3], "test-foo"),
        },
        "typeTags": {
            "entry": Entry::TYPE_TAG,
            "root": Root::TYPE_TAG,
        },
        "keys": {
            "seed": hex::encode(VECTOR_KEY_SEED),
            "public": key.public_key().to_token(),
            "private": key.to_token(),
        },
        "hashString": {
            "input": VECTOR_NAME,
            "hash": name_key.to_string(),
            "hex": hex::encode(name_key.as_bytes()),
        },
        "entry": {
            "value": lookup.entry,
            "hash": entry_digest.to_string(),
            "hex": hex::encode(entry_digest.as_bytes()),
        },
        "root": {
            "value": root,
            "hash": root_digest.map(|digest| digest.to_string()),
            "hex": root_digest.map(|digest| hex::encode(digest.as_bytes())),
        },
        "emptyHash": Hash::EMPTY.to_string(),
        "lookup": lookup,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{verify_lookup, TrustConfig};
    use keytree_trie::ReferenceTrie;

    #[test]
    fn test_two_leaf_trie_matches_reference() {
        let a = (hash_string("a"), hash_string("va"));
        let b = (hash_string("b"), hash_string("vb"));
        let (root, path) = two_leaf_trie(a, b).unwrap();

        let mut trie = ReferenceTrie::new();
        trie.insert(a.0, a.1);
        trie.insert(b.0, b.1);
        assert_eq!(root, trie.root());
        assert_eq!(path, trie.lookup(&a.0).0);
    }

    #[test]
    fn test_two_leaf_trie_rejects_equal_keys() {
        let a = (hash_string("a"), hash_string("va"));
        assert!(matches!(
            two_leaf_trie(a, a),
            Err(TrieError::DepthOutOfRange { .. })
        ));
    }

    #[test]
    fn test_vector_lookup_verifies() {
        let key = PrivateKey::from_seed(&VECTOR_KEY_SEED);
        let trust = TrustConfig::new([key.public_key()], 1).unwrap();
        let lookup = vector_lookup().unwrap();
        let verified = verify_lookup(&lookup, VECTOR_NAME, &trust, VECTOR_TIMESTAMP);
        assert!(verified.unwrap().is_some());
    }

    #[test]
    fn test_vectors_known_answers() {
        let vectors = generate_vectors().unwrap();
        assert_eq!(vectors["codec"]["wrapped"], "test-foo(04106)");
        assert_eq!(vectors["codec"]["bytes"], "010203");
        assert_eq!(
            vectors["typeTags"]["root"],
            "github.com/jellevandenhooff/keytree.Root-0.1"
        );
        assert_eq!(
            vectors["entry"]["hash"],
            "s63nw9cdnqbz822abj7r5jh6yeh1v7fy67rntentybs5dcrzjxwrwy7xegtzmccx3t5mv7z0h8qypgrgds8p66bvzz84pbb9mrmrrc0"
        );
        assert_eq!(
            vectors["root"]["value"]["RootHash"],
            "rnakjcxj07fkb4pzrkvyasanb8nx75q55a9bxasas7j8tv45yt3dmgmbxcfbb2v49rm037tkdbvy5gaa52qnysj66vf4ztytza9fgp0"
        );
        assert_eq!(
            vectors["root"]["hash"],
            "k6cevz8qmrsn9k3bck9a2dx03h96rgqk36r5jdmhjepcy9h8zxyyfmsjdd2kng8jda7ggarhecjbspx0zxq89ff260n8hf90y4fjz6g"
        );
    }
}
